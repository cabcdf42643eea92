/// Property-based tests for round resolution and name collision handling
///
/// These tests check that resolution is symmetric and fixed by the
/// dominance cycle, and that joining never yields duplicate names.
use proptest::prelude::*;
use roshambo::{Choice, Player, Room, RoomError, RoomPhase, Winner};

fn choice_strategy() -> impl Strategy<Value = Choice> {
    prop::sample::select(Choice::ALL.to_vec())
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["alice", "alice-1", "al", "bob", "a"]).prop_map(String::from)
}

fn play(first: Choice, second: Choice) -> (Room, Winner) {
    let mut room = Room::new("prop");
    for (name, choice) in [("one", first), ("two", second)] {
        let id = room.add_member(Player::new(Some(name))).unwrap().id();
        room.find_member_mut(id).unwrap().set_choice(choice.as_str());
    }
    let outcome = room.resolve_round();
    let winner = outcome.winner().cloned().expect("valid choices resolve");
    (room, winner)
}

fn flip(winner: Winner) -> Winner {
    match winner {
        Winner::Player(name) if name == "one" => Winner::Player("two".to_string()),
        Winner::Player(name) if name == "two" => Winner::Player("one".to_string()),
        other => other,
    }
}

proptest! {
    #[test]
    fn test_resolution_is_symmetric(a in choice_strategy(), b in choice_strategy()) {
        let (_, forward) = play(a, b);
        let (_, backward) = play(b, a);
        prop_assert_eq!(forward, flip(backward));
    }

    #[test]
    fn test_resolution_follows_dominance(a in choice_strategy(), b in choice_strategy()) {
        let (_, winner) = play(a, b);
        let expected = if a == b {
            Winner::Tie
        } else if a.beats(b) {
            Winner::Player("one".to_string())
        } else {
            Winner::Player("two".to_string())
        };
        prop_assert_eq!(winner, expected);
    }

    #[test]
    fn test_reset_clears_every_outcome(a in choice_strategy(), b in choice_strategy()) {
        let (mut room, _) = play(a, b);
        room.reset_round();
        prop_assert!(room.members().iter().all(|p| p.choice().is_none()));
        prop_assert_eq!(room.phase(), RoomPhase::Playing);
        prop_assert_eq!(room.history().len(), 1);
    }

    #[test]
    fn test_joined_names_are_distinct(first in name_strategy(), second in name_strategy()) {
        let mut room = Room::new("prop");
        room.add_member(Player::new(Some(&first))).unwrap();
        room.add_member(Player::new(Some(&second))).unwrap();

        let names: Vec<_> = room.members().iter().map(|p| p.username()).collect();
        prop_assert_ne!(names[0], names[1]);
    }

    #[test]
    fn test_full_room_rejects_any_name(third in name_strategy()) {
        let mut room = Room::new("prop");
        room.add_member(Player::new(Some("alice"))).unwrap();
        room.add_member(Player::new(Some("bob"))).unwrap();
        prop_assert_eq!(room.add_member(Player::new(Some(&third))).unwrap_err(), RoomError::Full);
    }
}

#[test]
fn test_dominance_table_is_exhaustive() {
    let table = [
        (Choice::Rock, Choice::Scissors),
        (Choice::Scissors, Choice::Paper),
        (Choice::Paper, Choice::Rock),
    ];
    for (winner, loser) in table {
        assert_eq!(play(winner, loser).1, Winner::Player("one".to_string()));
        assert_eq!(play(loser, winner).1, Winner::Player("two".to_string()));
    }
    for choice in Choice::ALL {
        assert_eq!(play(choice, choice).1, Winner::Tie);
    }
}

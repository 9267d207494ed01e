//! Parses typed lines into player actions.

use anyhow::{bail, Context, Result};
use cop_and_robber_core::Direction;

/// Action requested by whoever holds the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Move(Direction),
    Indicator(Direction),
    BeginLie,
    Fake(Direction),
    CancelLie,
    EndTurn,
    Board,
    History,
    Status,
    Restart,
    Help,
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  w/a/s/d or up/down/left/right   move one step
  i <dir>                         move your guess marker
  lie                             start a lie (robber only)
  fake <dir>                      direction to show instead of your next move
  cancel                          abandon a lie before choosing its direction
  end                             hand the device to the other player
  board | history | status        show the board, your moves or the turn
  restart | help | quit";

pub(crate) fn parse_action(line: &str) -> Result<Action> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        bail!("empty command, type `help` for a list");
    };
    let head = head.to_ascii_lowercase();
    let argument = words.next();
    if words.next().is_some() {
        bail!("too many words in `{}`", line.trim());
    }

    let action = match (head.as_str(), argument) {
        ("i" | "indicator", Some(word)) => Action::Indicator(parse_direction(word)?),
        ("fake", Some(word)) => Action::Fake(parse_direction(word)?),
        ("i" | "indicator" | "fake", None) => bail!("`{head}` needs a direction"),
        (_, Some(_)) => bail!("`{head}` takes no argument"),
        ("lie", None) => Action::BeginLie,
        ("cancel", None) => Action::CancelLie,
        ("end", None) => Action::EndTurn,
        ("board", None) => Action::Board,
        ("history", None) => Action::History,
        ("status", None) => Action::Status,
        ("restart", None) => Action::Restart,
        ("help" | "?", None) => Action::Help,
        ("quit" | "exit", None) => Action::Quit,
        (word, None) => Action::Move(
            parse_direction(word).with_context(|| format!("unknown command `{word}`"))?,
        ),
    };
    Ok(action)
}

fn parse_direction(word: &str) -> Result<Direction> {
    let direction = match word.to_ascii_lowercase().as_str() {
        "w" | "up" => Direction::Up,
        "s" | "down" => Direction::Down,
        "a" | "left" => Direction::Left,
        "d" | "right" => Direction::Right,
        other => bail!("`{other}` is not a direction"),
    };
    Ok(direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movement_keys_and_words() {
        assert_eq!(parse_action("w").expect("w"), Action::Move(Direction::Up));
        assert_eq!(parse_action(" Left ").expect("left"), Action::Move(Direction::Left));
        assert_eq!(parse_action("d").expect("d"), Action::Move(Direction::Right));
    }

    #[test]
    fn parses_directional_commands() {
        assert_eq!(
            parse_action("i down").expect("indicator"),
            Action::Indicator(Direction::Down)
        );
        assert_eq!(parse_action("fake a").expect("fake"), Action::Fake(Direction::Left));
    }

    #[test]
    fn parses_plain_commands() {
        assert_eq!(parse_action("lie").expect("lie"), Action::BeginLie);
        assert_eq!(parse_action("END").expect("end"), Action::EndTurn);
        assert_eq!(parse_action("quit").expect("quit"), Action::Quit);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_action("").is_err());
        assert!(parse_action("fake").is_err());
        assert!(parse_action("fake sideways").is_err());
        assert!(parse_action("end now").is_err());
        assert!(parse_action("dance").is_err());
        assert!(parse_action("i w extra").is_err());
    }
}

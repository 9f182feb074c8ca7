//! UCI command parsing.

use std::time::Duration;

use skewer_core::{Board, Move};

use crate::error::UciError;

/// Parameters for the `go` command. All optional; a bare `go` searches
/// without budgets.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    /// White's remaining time.
    pub wtime: Option<Duration>,
    /// Black's remaining time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Moves until the next time control.
    pub movestogo: Option<u32>,
    /// Search to this depth only.
    pub depth: Option<u8>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
    /// Visit at most this many nodes.
    pub nodes: Option<u64>,
    /// Search until `stop`.
    pub infinite: bool,
}

/// A position plus the hashes of everything played before it, for
/// repetition detection.
#[derive(Debug, Clone)]
pub struct PositionInfo {
    /// The position to search.
    pub board: Board,
    /// Hashes of all earlier positions in the game.
    pub history: Vec<u64>,
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset engine state.
    UciNewGame,
    /// `position` -- set up a board with optional moves applied.
    Position(PositionInfo),
    /// `go` -- start searching.
    Go(GoParams),
    /// `setoption` -- adjust a configuration knob.
    SetOption(UciOption),
    /// `stop` -- halt the current search.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
    /// Unrecognized command (silently ignored per the UCI spec).
    Unknown(String),
}

/// Options adjustable via `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciOption {
    /// Transposition table size in megabytes.
    Hash(u32),
}

/// Parse one line of UCI input.
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&keyword) = tokens.first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match keyword {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..]),
        "go" => parse_go(&tokens[1..]),
        "setoption" => parse_setoption(&tokens[1..]),
        other => Ok(Command::Unknown(other.to_string())),
    }
}

/// Parse `position startpos|fen <fen> [moves ...]`.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    if tokens.is_empty() {
        return Err(UciError::MalformedPosition);
    }

    let (mut board, rest) = if tokens[0] == "startpos" {
        (Board::starting_position(), &tokens[1..])
    } else if tokens[0] == "fen" {
        if tokens.len() < 7 {
            return Err(UciError::MalformedPosition);
        }
        let fen = tokens[1..7].join(" ");
        let board: Board = fen.parse().map_err(|source| UciError::InvalidFen {
            fen: fen.clone(),
            source,
        })?;
        (board, &tokens[7..])
    } else {
        return Err(UciError::MalformedPosition);
    };

    let mut history = Vec::new();
    if let Some((&"moves", move_strs)) = rest.split_first() {
        for uci_str in move_strs {
            let mv = Move::from_uci(uci_str, &board).ok_or_else(|| UciError::InvalidMove {
                uci_move: uci_str.to_string(),
            })?;
            history.push(board.hash());
            board.make(mv);
        }
    }

    Ok(Command::Position(PositionInfo { board, history }))
}

/// Parse the `go` arguments. Unknown tokens are skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "wtime" => {
                params.wtime = Some(parse_millis(tokens.get(i + 1), "wtime")?);
                i += 2;
            }
            "btime" => {
                params.btime = Some(parse_millis(tokens.get(i + 1), "btime")?);
                i += 2;
            }
            "winc" => {
                params.winc = Some(parse_millis(tokens.get(i + 1), "winc")?);
                i += 2;
            }
            "binc" => {
                params.binc = Some(parse_millis(tokens.get(i + 1), "binc")?);
                i += 2;
            }
            "movestogo" => {
                params.movestogo = Some(parse_number(tokens.get(i + 1), "movestogo")?);
                i += 2;
            }
            "depth" => {
                params.depth = Some(parse_number(tokens.get(i + 1), "depth")?);
                i += 2;
            }
            "movetime" => {
                params.movetime = Some(parse_millis(tokens.get(i + 1), "movetime")?);
                i += 2;
            }
            "nodes" => {
                params.nodes = Some(parse_number(tokens.get(i + 1), "nodes")?);
                i += 2;
            }
            "infinite" => {
                params.infinite = true;
                i += 1;
            }
            _ => i += 1,
        }
    }

    Ok(Command::Go(params))
}

/// Parse `setoption name <name> [value <value>]`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    // Expected shape: name <ident...> value <value>
    let name_pos = tokens.iter().position(|&t| t == "name");
    let value_pos = tokens.iter().position(|&t| t == "value");
    let (Some(name_pos), Some(value_pos)) = (name_pos, value_pos) else {
        return Err(UciError::InvalidOption {
            reason: "expected `name <option> value <value>`".to_string(),
        });
    };
    if value_pos < name_pos + 1 {
        return Err(UciError::InvalidOption {
            reason: "`value` must follow `name`".to_string(),
        });
    }

    let name = tokens[name_pos + 1..value_pos].join(" ");
    let value = tokens[value_pos + 1..].join(" ");

    match name.to_ascii_lowercase().as_str() {
        "hash" => {
            let mb: u32 = value.parse().map_err(|_| UciError::InvalidNumber {
                field: "Hash",
                found: value.clone(),
            })?;
            Ok(Command::SetOption(UciOption::Hash(mb.clamp(1, 4096))))
        }
        other => Err(UciError::InvalidOption {
            reason: format!("unknown option \"{other}\""),
        }),
    }
}

fn parse_millis(token: Option<&&str>, field: &'static str) -> Result<Duration, UciError> {
    let ms: u64 = parse_number(token, field)?;
    Ok(Duration::from_millis(ms))
}

fn parse_number<T: std::str::FromStr>(
    token: Option<&&str>,
    field: &'static str,
) -> Result<T, UciError> {
    let raw = token.ok_or(UciError::InvalidNumber {
        field,
        found: String::new(),
    })?;
    raw.parse().map_err(|_| UciError::InvalidNumber {
        field,
        found: raw.to_string(),
    })
}

//! Event-driven UCI engine loop.
//!
//! The main thread multiplexes two event sources over one channel: a
//! stdin reader thread and, while searching, a worker thread that runs
//! the (single-threaded) search. The worker owns the `Search` tables for
//! the duration of a search and returns them with the result, so `stop`
//! can be serviced while keeping the tables warm between moves.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use tracing::{debug, info, warn};

use skewer_core::{Board, generate_legal_moves};
use skewer_engine::{MATE_VALUE, Search, SearchResult, Value, limits_from_go, value::is_mate};

use crate::command::{Command, GoParams, PositionInfo, UciOption, parse_command};
use crate::error::UciError;

/// Configuration knobs adjustable via `setoption`.
struct EngineConfig {
    /// Transposition table size in megabytes.
    hash_mb: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { hash_mb: 16 }
    }
}

/// Events processed by the main engine loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(SearchDone),
    InputClosed,
}

/// Payload returned by the search worker when it finishes.
struct SearchDone {
    result: SearchResult,
    search: Search,
}

/// The UCI engine: current position, search tables, and loop state.
pub struct UciEngine {
    board: Board,
    history: Vec<u64>,
    /// `None` while a search worker owns the tables.
    search: Option<Search>,
    searching: bool,
    stop_flag: Arc<AtomicBool>,
    config: EngineConfig,
    pending_clear: bool,
    pending_resize: Option<u32>,
}

impl UciEngine {
    /// Create an engine at the starting position.
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            history: Vec::new(),
            search: Some(Search::new()),
            searching: false,
            stop_flag: Arc::new(AtomicBool::new(false)),
            config: EngineConfig::default(),
            pending_clear: false,
            pending_resize: None,
        }
    }

    /// Run the event loop, reading stdin until `quit` or input closes.
    pub fn run(mut self) -> Result<(), io::Error> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        debug!(cmd = %trimmed, "received UCI command");
                        if stdin_tx
                            .send(EngineEvent::UciCommand(parse_command(trimmed)))
                            .is_err()
                        {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = stdin_tx.send(EngineEvent::InputClosed);
        });

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(cmd)) => match cmd {
                    Command::Uci => self.handle_uci(),
                    Command::IsReady => println!("readyok"),
                    Command::UciNewGame => self.handle_ucinewgame(),
                    Command::Position(info) => self.handle_position(info),
                    Command::Go(params) => self.handle_go(params, &tx),
                    Command::SetOption(option) => self.handle_setoption(option),
                    Command::Stop => self.handle_stop(),
                    Command::Quit => {
                        if self.searching {
                            self.handle_stop();
                            // Wait for the worker to hand the tables back.
                            for ev in &rx {
                                if let EngineEvent::SearchDone(done) = ev {
                                    self.finish_search(done);
                                    break;
                                }
                            }
                        }
                        break;
                    }
                    Command::Unknown(_) => {}
                },
                EngineEvent::UciCommand(Err(e)) => {
                    warn!(error = %e, "UCI parse error");
                }
                EngineEvent::SearchDone(done) => self.finish_search(done),
                EngineEvent::InputClosed => break,
            }
        }

        info!("skewer shutting down");
        Ok(())
    }

    fn handle_uci(&self) {
        println!("id name skewer");
        println!("id author the skewer developers");
        println!(
            "option name Hash type spin default {} min 1 max 4096",
            self.config.hash_mb
        );
        println!("uciok");
    }

    fn handle_ucinewgame(&mut self) {
        self.board = Board::starting_position();
        self.history.clear();
        if let Some(search) = self.search.as_mut() {
            search.clear_tables();
        } else {
            // The worker owns the tables; clear when they come back.
            self.pending_clear = true;
        }
    }

    fn handle_position(&mut self, info: PositionInfo) {
        self.board = info.board;
        self.history = info.history;
    }

    fn handle_setoption(&mut self, option: UciOption) {
        match option {
            UciOption::Hash(mb) => {
                self.config.hash_mb = mb;
                if let Some(search) = self.search.as_mut() {
                    search.resize_table(mb as usize);
                } else {
                    self.pending_resize = Some(mb);
                }
            }
        }
    }

    fn handle_go(&mut self, params: GoParams, tx: &mpsc::Sender<EngineEvent>) {
        if self.searching {
            warn!("go received while already searching, ignoring");
            return;
        }

        // A terminal position never reaches the search core.
        if generate_legal_moves(&self.board).is_empty() {
            println!("bestmove 0000");
            return;
        }

        self.stop_flag = Arc::new(AtomicBool::new(false));
        let control = limits_from_go(
            params.wtime,
            params.btime,
            params.winc,
            params.binc,
            params.movestogo,
            params.movetime,
            params.nodes,
            params.infinite,
            self.board.side_to_move(),
            Arc::clone(&self.stop_flag),
        );
        let max_depth = params.depth.unwrap_or(64);

        let mut search = self.search.take().unwrap_or_default();
        let mut board = self.board.clone();
        let history = self.history.clone();
        let tx = tx.clone();

        std::thread::spawn(move || {
            let result = search.search(&mut board, max_depth, &control, &history, |depth, value, visited, best| {
                let elapsed_ms = control.elapsed().as_millis().max(1);
                let nps = (visited as u128 * 1000) / elapsed_ms;
                let score = format_score(value);
                println!(
                    "info depth {depth} score {score} nodes {visited} nps {nps} time {elapsed_ms} pv {best}"
                );
            });
            let _ = tx.send(EngineEvent::SearchDone(SearchDone { result, search }));
        });

        self.searching = true;
    }

    fn handle_stop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    fn finish_search(&mut self, done: SearchDone) {
        let mut search = done.search;

        if let Some(mb) = self.pending_resize.take() {
            // A resize supersedes a clear: the new allocation is empty.
            search.resize_table(mb as usize);
            self.pending_clear = false;
        } else if self.pending_clear {
            search.clear_tables();
            self.pending_clear = false;
        }

        self.search = Some(search);
        self.searching = false;

        println!("bestmove {}", done.result.best_move);
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a search value as a UCI score: centipawns, or moves-to-mate
/// when the value lies in the mate band.
fn format_score(value: Value) -> String {
    if is_mate(value) {
        let plies = MATE_VALUE - value.abs();
        let moves = (plies + 1) / 2;
        if value > 0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {value}")
    }
}

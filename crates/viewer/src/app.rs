//! Interactive loop: one command or one evaluation result at a time.

use chess_core::uci::BestMove;
use chess_core::Game;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::error::ViewerError;
use crate::render;
use crate::session::{EvaluationRequest, Verdict, ViewerSession};

type EvaluationResult = (EvaluationRequest, Result<BestMove, ViewerError>);

pub enum Source {
    User(String),
    Pgn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Jump(usize),
    Select(usize),
    List,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, ViewerError> {
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or("n");
    let number = |arg: Option<&str>| {
        arg.and_then(|a| a.parse::<usize>().ok())
            .ok_or_else(|| ViewerError::Input(format!("'{head}' needs a number")))
    };

    match head {
        "n" | "next" => Ok(Command::Next),
        "p" | "prev" => Ok(Command::Prev),
        "g" | "go" => number(words.next()).map(Command::Jump),
        "s" | "select" => number(words.next()).map(Command::Select),
        "l" | "list" => Ok(Command::List),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" => Ok(Command::Quit),
        other => Err(ViewerError::Input(format!("Unknown command '{other}' (h for help)"))),
    }
}

const HELP: &str = "n: next move  p: previous move  g <k>: go to move k  \
                    s <i>: select game  l: list games  q: quit";

pub struct App {
    api: ApiClient,
    session: ViewerSession,
    games: Vec<Game>,
    username: Option<String>,
    in_flight: Option<JoinHandle<()>>,
    results: mpsc::UnboundedSender<EvaluationResult>,
}

impl App {
    fn new(api: ApiClient, results: mpsc::UnboundedSender<EvaluationResult>) -> Self {
        Self {
            api,
            session: ViewerSession::new(),
            games: Vec::new(),
            username: None,
            in_flight: None,
            results,
        }
    }

    async fn open(&mut self, source: Source) -> Result<String, ViewerError> {
        match source {
            Source::Pgn(text) => {
                self.session.load_pgn(&text)?;
                Ok(self.screen())
            }
            Source::User(username) => {
                let games = self.api.latest_games(&username).await?;
                if games.is_empty() {
                    return Err(ViewerError::NotFound(format!("No games found for {username}")));
                }
                let picker = render::render_game_picker(&render::game_picker(&games, &username));
                self.games = games;
                self.username = Some(username);
                Ok(picker)
            }
        }
    }

    /// Drop any evaluation still running for an older cursor position.
    fn cancel_in_flight(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }

    fn spawn_evaluation(&mut self, request: EvaluationRequest) {
        let api = self.api.clone();
        let results = self.results.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = api.analyze(&request.fen).await;
            let _ = results.send((request, result));
        }));
    }

    /// Returns the text to show, or `None` to quit.
    async fn handle(&mut self, command: Command) -> Result<Option<String>, ViewerError> {
        match command {
            Command::Next => {
                if let Some(request) = self.session.advance() {
                    self.cancel_in_flight();
                    self.spawn_evaluation(request);
                }
            }
            Command::Prev => {
                if self.session.retreat() {
                    self.cancel_in_flight();
                }
            }
            Command::Jump(k) => {
                self.session.jump_to(k)?;
                self.cancel_in_flight();
            }
            Command::Select(index) => {
                let username = self
                    .username
                    .clone()
                    .ok_or_else(|| ViewerError::Input("No game list loaded".into()))?;
                let game = self.api.game(&username, index).await?;
                // A failed load keeps the current game and its pending evaluation.
                self.session.load_game(game)?;
                self.cancel_in_flight();
            }
            Command::List => {
                let username = self.username.as_deref().unwrap_or_default();
                return Ok(Some(render::render_game_picker(&render::game_picker(
                    &self.games,
                    username,
                ))));
            }
            Command::Help => return Ok(Some(HELP.to_string())),
            Command::Quit => return Ok(None),
        }
        Ok(Some(self.screen()))
    }

    fn engine_line(&self) -> Option<String> {
        let ply = self.session.navigator().cursor().checked_sub(1)?;
        let played = &self.session.navigator().moves()[ply];
        let line = match self.session.verdicts()[ply] {
            Verdict::Pending => "Engine: thinking...".to_string(),
            Verdict::Unavailable => "Engine: recommendation unavailable".to_string(),
            Verdict::Unchecked => return None,
            Verdict::Matched | Verdict::Missed => {
                let rec = self.session.recommendation().filter(|r| r.ply == ply)?;
                let verdict = if rec.matched { "matches" } else { "differs from" };
                format!("Engine: {} ({verdict} {})", rec.best.mv, played.san)
            }
        };
        Some(line)
    }

    fn screen(&self) -> String {
        let nav = self.session.navigator();
        let headers = self.session.headers();
        let mut out = String::new();

        if let (Some(white), Some(black)) = (&headers.white, &headers.black) {
            out.push_str(&format!("{white} vs {black}\n"));
        }
        if let Some(game) = self.session.game().filter(|g| !g.url.is_empty()) {
            out.push_str(&format!("{}\n", game.url));
        }
        out.push_str(&render::render_board(nav.position()));
        out.push_str(&format!("Move {}/{}\n", nav.cursor(), nav.len()));
        out.push_str(&render::render_move_list(&render::move_list(
            nav.moves(),
            nav.cursor(),
            self.session.verdicts(),
        )));
        out.push('\n');
        if let Some(line) = self.engine_line() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

pub async fn run(api: ApiClient, source: Source) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<EvaluationResult>();
    let mut app = App::new(api, tx);

    println!("{}", app.open(source).await?);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let outcome = match parse_command(&line) {
                    Ok(cmd) => app.handle(cmd).await,
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(Some(text)) => println!("{text}"),
                    Ok(None) => break,
                    Err(e) => eprintln!("{e}"),
                }
            }
            Some((request, result)) = rx.recv() => {
                if app.session.apply_evaluation(&request, result) {
                    if let Some(line) = app.engine_line() {
                        println!("{line}");
                    }
                }
            }
        }
    }

    app.cancel_in_flight();
    Ok(())
}

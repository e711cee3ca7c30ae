//! Room session: an isolated Tokio task that owns one room's round cycle.
//!
//! Each room runs in its own task and talks to the outside world through an
//! mpsc channel. The same loop also waits on the room's single deadline,
//! so player commands and timer expiry are handled strictly one at a time,
//! in arrival order, and never race each other.
//!
//! # Lifecycle
//!
//! A session is spawned either for a brand-new room, with its host already
//! seated and round one under way, or empty, to revive a room whose durable
//! record outlived its last session. In the second case the first join
//! starts round one.
//!
//! The session stops when its last member leaves, on an explicit shutdown,
//! or when every [`RoomHandle`] is dropped. Stopping cancels the armed
//! deadline, so a stopped room never emits another event.
//!
//! # Rounds
//!
//! The member queue doubles as the rotation order: the front is the
//! drawer, and each new round rotates the queue by one. Joiners go to the
//! back, so they draw after everyone already waiting. A drawer who leaves
//! mid-round hands the rest of the round to the next in line.

use std::collections::VecDeque;
use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use inklink_protocol::{Recipient, RoomCode, ServerEvent, Stroke, UserId};
use inklink_store::{RoomRecord, Store, StoreError};
use inklink_timer::{Fired, TurnScheduler};
use rand::seq::IndexedRandom;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};

use crate::words::{self, WordCatalog, WordSource};
use crate::{Broadcaster, RoomConfig, RoomError, RoomTimer, RoundPhase, award, hint};

/// Distinguishes successive sessions of the same room code.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Commands and replies
// ---------------------------------------------------------------------------

/// Commands sent to a room session through its channel.
///
/// Variants carrying a `oneshot::Sender` expect a reply; the rest are
/// fire-and-forget. Strokes and guesses are the high-volume traffic, and
/// their outcome reaches users as broadcast events, so nobody waits on
/// them.
pub(crate) enum RoomCommand {
    /// Add a member, or resync one who is already in.
    Join {
        user: UserId,
        reply: oneshot::Sender<JoinOutcome>,
    },
    Leave {
        user: UserId,
        reply: oneshot::Sender<Result<LeaveOutcome, RoomError>>,
    },
    ChooseWord {
        user: UserId,
        word: String,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Stroke {
        user: UserId,
        stroke: Stroke,
    },
    Clear {
        user: UserId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Guess {
        user: UserId,
        text: String,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// What a joining user gets back.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub room: RoomCode,
    /// Current stroke history, for redrawing the canvas.
    pub strokes: Vec<Stroke>,
    /// Rotation order after the join; the first id is the drawer.
    pub players: Vec<UserId>,
    /// `true` if the user was already a member (nothing changed).
    pub already_member: bool,
}

/// Result of a leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The user left; others remain.
    Left,
    /// The user was the last member. The session has stopped and its
    /// timers are cancelled.
    Emptied,
}

/// A snapshot of a room session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub code: RoomCode,
    pub session_id: u64,
    pub phase: RoundPhase,
    pub players: Vec<UserId>,
    pub drawer: Option<UserId>,
    /// Rounds started so far in this session.
    pub round: u64,
    /// The deadline currently armed, if any.
    pub armed: Option<RoomTimer>,
    /// Milliseconds until that deadline fires.
    pub remaining_ms: Option<u64>,
    pub stroke_count: usize,
    /// A word is chosen and still guessable.
    pub word_chosen: bool,
    /// Candidates still awaiting the drawer's choice.
    pub pending_choices: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running room session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    code: RoomCode,
    session_id: u64,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Unique per spawned session, so a stale handle can be told apart
    /// from a revived session under the same code.
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// `true` once the session task has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Adds `user` to the rotation queue (idempotent).
    pub async fn join(&self, user: UserId) -> Result<JoinOutcome, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Join { user, reply }).await?;
        rx.await.map_err(|_| self.unavailable())
    }

    /// Removes `user` from the rotation queue.
    pub async fn leave(&self, user: UserId) -> Result<LeaveOutcome, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Leave { user, reply }).await?;
        rx.await.map_err(|_| self.unavailable())?
    }

    /// The drawer picks one of the offered candidates.
    pub async fn choose_word(&self, user: UserId, word: String) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::ChooseWord { user, word, reply }).await?;
        rx.await.map_err(|_| self.unavailable())?
    }

    /// Relays a stroke. Strokes from anyone but the drawer are dropped
    /// silently by the session.
    pub async fn submit_stroke(&self, user: UserId, stroke: Stroke) -> Result<(), RoomError> {
        self.send(RoomCommand::Stroke { user, stroke }).await
    }

    /// Wipes the canvas. Only the drawer may.
    pub async fn clear_canvas(&self, user: UserId) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Clear { user, reply }).await?;
        rx.await.map_err(|_| self.unavailable())?
    }

    /// Submits a guess (or chat line).
    pub async fn submit_guess(&self, user: UserId, text: String) -> Result<(), RoomError> {
        self.send(RoomCommand::Guess { user, text }).await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Info { reply }).await?;
        rx.await.map_err(|_| self.unavailable())
    }

    /// Stops the session. Its armed deadline is dropped with it.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender.send(cmd).await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.code.clone())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Collaborators shared by every session a registry spawns.
pub(crate) struct Shared<S, B> {
    pub store: Arc<S>,
    pub broadcaster: Arc<B>,
    pub catalog: Arc<WordCatalog>,
    pub config: RoomConfig,
}

impl<S, B> Clone for Shared<S, B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            broadcaster: Arc::clone(&self.broadcaster),
            catalog: Arc::clone(&self.catalog),
            config: self.config.clone(),
        }
    }
}

/// The per-room state machine. Lives inside its own task.
struct RoomSession<S, B> {
    code: RoomCode,
    session_id: u64,
    shared: Shared<S, B>,
    /// Rotation queue. The front is always the drawer.
    players: VecDeque<UserId>,
    phase: RoundPhase,
    round: u64,
    current_word: Option<String>,
    pending_choices: Vec<String>,
    strokes: Vec<Stroke>,
    /// Start of the guessing window (or of the round, before a choice).
    started_at: Instant,
    scheduler: TurnScheduler<RoomTimer>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl<S: Store, B: Broadcaster> RoomSession<S, B> {
    async fn run(mut self, host: Option<UserId>) {
        tracing::info!(room = %self.code, session = self.session_id, "room session started");

        // The host is in before any queued command is read, so a concurrent
        // joiner can never take round one's drawing turn.
        if let Some(host) = host {
            self.handle_join(host).await;
        }

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if self.handle_command(cmd).await.is_break() {
                        break;
                    }
                }
                fired = self.scheduler.wait() => {
                    self.handle_deadline(fired).await;
                }
            }
        }

        self.scheduler.cancel();
        let timers = self.scheduler.metrics();
        tracing::info!(
            room = %self.code,
            session = self.session_id,
            rounds = self.round,
            timers_fired = timers.fired,
            timers_replaced = timers.replaced,
            timers_cancelled = timers.cancelled,
            "room session stopped"
        );
    }

    async fn handle_command(&mut self, cmd: RoomCommand) -> ControlFlow<()> {
        match cmd {
            RoomCommand::Join { user, reply } => {
                let outcome = self.handle_join(user).await;
                let _ = reply.send(outcome);
            }
            RoomCommand::Leave { user, reply } => {
                let result = self.handle_leave(user).await;
                let emptied = matches!(result, Ok(LeaveOutcome::Emptied));
                let _ = reply.send(result);
                if emptied {
                    return ControlFlow::Break(());
                }
            }
            RoomCommand::ChooseWord { user, word, reply } => {
                let _ = reply.send(self.handle_choose(user, word));
            }
            RoomCommand::Stroke { user, stroke } => self.handle_stroke(user, stroke),
            RoomCommand::Clear { user, reply } => {
                let _ = reply.send(self.handle_clear(user));
            }
            RoomCommand::Guess { user, text } => self.handle_guess(user, text).await,
            RoomCommand::Info { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Shutdown => {
                tracing::info!(room = %self.code, "room shutting down");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    // -- membership ----------------------------------------------------------

    async fn handle_join(&mut self, user: UserId) -> JoinOutcome {
        if self.is_member(&user) {
            tracing::debug!(room = %self.code, %user, "already a member, resyncing");
            self.resync_member(&user).await;
            return self.join_outcome(true);
        }

        self.players.push_back(user.clone());
        let username = self.display_name(&user).await;
        tracing::info!(
            room = %self.code,
            %user,
            players = self.players.len(),
            "player joined"
        );

        self.dispatch(
            Recipient::AllExcept(user.clone()),
            ServerEvent::PlayerJoined {
                user_id: user.clone(),
                username,
            },
        );
        self.broadcast_player_list();

        if self.round == 0 {
            // First member of a fresh or revived session.
            self.start_round().await;
        } else {
            self.resync_member(&user).await;
        }
        self.join_outcome(false)
    }

    async fn handle_leave(&mut self, user: UserId) -> Result<LeaveOutcome, RoomError> {
        let Some(position) = self.players.iter().position(|p| *p == user) else {
            return Err(RoomError::NotInRoom(user, self.code.clone()));
        };
        self.players.remove(position);
        tracing::info!(
            room = %self.code,
            %user,
            players = self.players.len(),
            "player left"
        );

        if self.players.is_empty() {
            self.scheduler.cancel();
            return Ok(LeaveOutcome::Emptied);
        }

        self.dispatch(Recipient::All, ServerEvent::PlayerLeft { user_id: user });
        self.broadcast_player_list();
        if position == 0 {
            self.hand_off_drawing().await;
        }
        Ok(LeaveOutcome::Left)
    }

    /// The drawer left mid-round: the new front of the queue takes over
    /// the rest of the round. The round's deadline is left alone.
    async fn hand_off_drawing(&mut self) {
        let Some(drawer) = self.players.front().cloned() else {
            return;
        };
        // Strokes belong to the drawer who made them.
        self.strokes.clear();
        self.dispatch(Recipient::All, ServerEvent::Clear);

        let drawer_username = self.display_name(&drawer).await;
        tracing::info!(room = %self.code, drawer = %drawer, "drawing handed off");
        self.dispatch(
            Recipient::All,
            ServerEvent::DrawerChanged {
                drawer_id: drawer.clone(),
                drawer_username,
            },
        );
        self.send_drawer_state(&drawer);
    }

    /// Brings a (re)joining member up to date: canvas, round, and the
    /// drawer's private state if they are the drawer.
    async fn resync_member(&self, user: &UserId) {
        self.dispatch(
            Recipient::User(user.clone()),
            ServerEvent::CanvasSync {
                strokes: self.strokes.clone(),
            },
        );

        let Some(drawer) = self.players.front() else {
            return;
        };
        if self.round == 0 {
            return;
        }
        let drawer_username = self.display_name(drawer).await;
        self.dispatch(
            Recipient::User(user.clone()),
            ServerEvent::RoundStart {
                drawer_id: drawer.clone(),
                drawer_username,
                word_hint_mask: self.current_mask(),
            },
        );
        if drawer == user {
            self.send_drawer_state(user);
        }
    }

    /// Privately sends the drawer what only they may see.
    fn send_drawer_state(&self, drawer: &UserId) {
        let event = match (self.phase, &self.current_word) {
            (RoundPhase::ChoosingWord, _) => ServerEvent::WordChoices {
                options: self.pending_choices.clone(),
            },
            (RoundPhase::Drawing, Some(word)) => ServerEvent::WordReveal { word: word.clone() },
            (RoundPhase::Drawing, None) => return,
        };
        self.dispatch(Recipient::User(drawer.clone()), event);
    }

    // -- round cycle ---------------------------------------------------------

    async fn start_round(&mut self) {
        if self.players.is_empty() {
            return;
        }
        if self.round > 0 {
            self.players.rotate_left(1);
        }
        let Some(drawer) = self.players.front().cloned() else {
            return;
        };

        self.round += 1;
        self.phase = RoundPhase::ChoosingWord;
        self.current_word = None;
        self.strokes.clear();
        self.started_at = Instant::now();

        let record = self.room_record().await;
        self.pending_choices = pick_candidates(
            record.as_ref(),
            &self.shared.catalog,
            self.shared.config.candidate_count,
        );

        let drawer_username = self.display_name(&drawer).await;
        tracing::info!(
            room = %self.code,
            round = self.round,
            drawer = %drawer,
            candidates = self.pending_choices.len(),
            "round started"
        );

        self.dispatch(
            Recipient::All,
            ServerEvent::RoundStart {
                drawer_id: drawer.clone(),
                drawer_username,
                word_hint_mask: String::new(),
            },
        );
        self.dispatch(
            Recipient::User(drawer),
            ServerEvent::WordChoices {
                options: self.pending_choices.clone(),
            },
        );
        self.scheduler
            .arm(RoomTimer::WordChoice, self.shared.config.choice_timeout);
    }

    fn handle_choose(&mut self, user: UserId, word: String) -> Result<(), RoomError> {
        if !self.is_member(&user) {
            return Err(RoomError::NotInRoom(user, self.code.clone()));
        }
        if self.players.front() != Some(&user) {
            return Err(RoomError::UnauthorizedAction {
                user,
                action: "choose the word",
            });
        }
        if self.phase != RoundPhase::ChoosingWord || !self.pending_choices.contains(&word) {
            tracing::debug!(room = %self.code, %user, %word, "stale word choice");
            return Err(RoomError::StaleChoice(word));
        }
        self.begin_drawing(word);
        Ok(())
    }

    /// ChoosingWord → Drawing.
    fn begin_drawing(&mut self, word: String) {
        let Some(drawer) = self.players.front().cloned() else {
            return;
        };
        tracing::info!(room = %self.code, round = self.round, %word, "word chosen");

        self.phase = RoundPhase::Drawing;
        self.pending_choices.clear();
        self.started_at = Instant::now();
        self.dispatch(
            Recipient::All,
            ServerEvent::WordChosenHint {
                mask: hint::mask(&word),
            },
        );
        self.dispatch(
            Recipient::User(drawer),
            ServerEvent::WordReveal { word: word.clone() },
        );
        self.current_word = Some(word);
        // Replaces the choice deadline.
        self.scheduler
            .arm(RoomTimer::Guessing, self.shared.config.guess_timeout);
    }

    fn handle_stroke(&mut self, user: UserId, stroke: Stroke) {
        if self.phase != RoundPhase::Drawing || self.players.front() != Some(&user) {
            tracing::trace!(room = %self.code, %user, "stroke discarded");
            return;
        }
        self.strokes.push(stroke.clone());
        self.dispatch(Recipient::AllExcept(user), ServerEvent::Stroke(stroke));
    }

    fn handle_clear(&mut self, user: UserId) -> Result<(), RoomError> {
        if !self.is_member(&user) {
            return Err(RoomError::NotInRoom(user, self.code.clone()));
        }
        if self.players.front() != Some(&user) {
            return Err(RoomError::UnauthorizedAction {
                user,
                action: "clear the canvas",
            });
        }
        self.strokes.clear();
        self.dispatch(Recipient::All, ServerEvent::Clear);
        Ok(())
    }

    async fn handle_guess(&mut self, user: UserId, text: String) {
        if !self.is_member(&user) {
            tracing::debug!(room = %self.code, %user, "guess from non-member ignored");
            return;
        }
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let normalized = text.to_lowercase();
        let is_drawer = self.players.front() == Some(&user);

        if let Some(word) = &self.current_word {
            // Stored words may carry any casing; compare both sides folded.
            let word = word.to_lowercase();
            if is_drawer && normalized.contains(word.as_str()) {
                tracing::debug!(room = %self.code, "drawer message with the word suppressed");
                return;
            }
            if !is_drawer && normalized == word {
                self.score_guess(user).await;
                return;
            }
        }

        let username = self.display_name(&user).await;
        self.dispatch(
            Recipient::All,
            ServerEvent::Chat {
                user_id: user,
                username,
                text: text.to_owned(),
            },
        );
    }

    /// A correct guess ends the round.
    async fn score_guess(&mut self, guesser: UserId) {
        let Some(word) = self.current_word.take() else {
            return;
        };
        self.scheduler.cancel_kind(RoomTimer::Guessing);

        let latency = self.started_at.elapsed();
        let xp = award(latency, self.shared.config.guess_timeout);
        let guesser_name = self.display_name(&guesser).await;
        tracing::info!(
            room = %self.code,
            round = self.round,
            user = %guesser,
            xp,
            latency_ms = latency.as_millis() as u64,
            "correct guess"
        );

        self.dispatch(
            Recipient::All,
            ServerEvent::CorrectGuess {
                guesser_name,
                xp,
                word: word.clone(),
            },
        );
        self.dispatch(
            Recipient::All,
            ServerEvent::WordChosenHint {
                mask: hint::reveal(&word),
            },
        );
        self.persist_award(guesser, xp);
        self.scheduler
            .arm(RoomTimer::NextRound, self.shared.config.correct_guess_delay);
    }

    /// Writes the award in the background. A failed write is logged and
    /// never holds up the round.
    fn persist_award(&self, user: UserId, xp: u32) {
        let store = Arc::clone(&self.shared.store);
        let broadcaster = Arc::clone(&self.shared.broadcaster);
        let limit = self.shared.config.store_timeout;
        let room = self.code.clone();

        tokio::spawn(async move {
            match time::timeout(limit, store.upsert_user_xp(&user, xp)).await {
                Ok(Ok(record)) => {
                    broadcaster.send_to_user(
                        &user,
                        &ServerEvent::UserScore {
                            xp: record.xp,
                            level: record.level,
                        },
                    );
                }
                Ok(Err(e)) => {
                    tracing::warn!(%room, %user, xp, error = %e, "failed to persist award");
                }
                Err(_) => {
                    tracing::warn!(%room, %user, xp, "timed out persisting award");
                }
            }
        });
    }

    /// Acts on an expired deadline, unless the room moved on since it was
    /// armed.
    async fn handle_deadline(&mut self, fired: Fired<RoomTimer>) {
        tracing::debug!(
            room = %self.code,
            kind = ?fired.kind,
            generation = fired.generation,
            late_by_ms = fired.late_by.as_millis() as u64,
            "deadline fired"
        );
        if self.players.is_empty() || self.phase != fired.kind.armed_in() {
            tracing::trace!(room = %self.code, kind = ?fired.kind, "stale deadline ignored");
            return;
        }

        match fired.kind {
            RoomTimer::WordChoice => match auto_pick(&self.pending_choices) {
                Some(word) => {
                    tracing::debug!(room = %self.code, %word, "choice timed out, auto-picked");
                    self.begin_drawing(word);
                }
                None => {
                    tracing::warn!(room = %self.code, "no candidates to auto-pick, restarting round");
                    self.start_round().await;
                }
            },
            RoomTimer::Guessing => {
                let Some(word) = self.current_word.take() else {
                    return;
                };
                tracing::info!(room = %self.code, round = self.round, %word, "time up");
                self.dispatch(Recipient::All, ServerEvent::TimeUp { word });
                self.scheduler
                    .arm(RoomTimer::NextRound, self.shared.config.time_up_delay);
            }
            RoomTimer::NextRound => self.start_round().await,
        }
    }

    // -- helpers -------------------------------------------------------------

    fn is_member(&self, user: &UserId) -> bool {
        self.players.contains(user)
    }

    fn current_mask(&self) -> String {
        self.current_word
            .as_deref()
            .map(hint::mask)
            .unwrap_or_default()
    }

    fn broadcast_player_list(&self) {
        self.dispatch(
            Recipient::All,
            ServerEvent::PlayerList {
                ids: self.players.iter().cloned().collect(),
            },
        );
    }

    /// Resolves `recipient` against the current members and hands the
    /// event to the broadcaster.
    fn dispatch(&self, recipient: Recipient, event: ServerEvent) {
        let broadcaster = &self.shared.broadcaster;
        match recipient {
            Recipient::User(user) => broadcaster.send_to_user(&user, &event),
            Recipient::All => {
                let members: Vec<UserId> = self.players.iter().cloned().collect();
                broadcaster.broadcast_to_room(&self.code, &members, &event);
            }
            recipient @ Recipient::AllExcept(_) => {
                let members: Vec<UserId> = self
                    .players
                    .iter()
                    .filter(|p| recipient.includes(p))
                    .cloned()
                    .collect();
                broadcaster.broadcast_to_room(&self.code, &members, &event);
            }
        }
    }

    /// The user's registered name, or their id if they have none or the
    /// store can't answer in time.
    async fn display_name(&self, user: &UserId) -> String {
        self.bounded("get_user", self.shared.store.get_user(user))
            .await
            .flatten()
            .map(|record| record.username)
            .unwrap_or_else(|| user.to_string())
    }

    async fn room_record(&self) -> Option<RoomRecord> {
        self.bounded("get_room_record", self.shared.store.get_room_record(&self.code))
            .await
            .flatten()
    }

    /// Runs a store call under the configured timeout. Failures are logged
    /// and come back as `None`.
    async fn bounded<T>(
        &self,
        call: &'static str,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Option<T> {
        match time::timeout(self.shared.config.store_timeout, fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!(room = %self.code, call, error = %e, "store call failed");
                None
            }
            Err(_) => {
                tracing::warn!(room = %self.code, call, "store call timed out");
                None
            }
        }
    }

    fn join_outcome(&self, already_member: bool) -> JoinOutcome {
        JoinOutcome {
            room: self.code.clone(),
            strokes: self.strokes.clone(),
            players: self.players.iter().cloned().collect(),
            already_member,
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.code.clone(),
            session_id: self.session_id,
            phase: self.phase,
            players: self.players.iter().cloned().collect(),
            drawer: self.players.front().cloned(),
            round: self.round,
            armed: self.scheduler.armed(),
            remaining_ms: self.scheduler.remaining().map(|d| d.as_millis() as u64),
            stroke_count: self.strokes.len(),
            word_chosen: self.current_word.is_some(),
            pending_choices: self.pending_choices.clone(),
        }
    }
}

/// Candidates for the next round from the room's configured source.
fn pick_candidates(record: Option<&RoomRecord>, catalog: &WordCatalog, count: usize) -> Vec<String> {
    let source = match record {
        Some(record) if record.uses_custom_words() => WordSource::Custom(&record.custom_words),
        _ => WordSource::Catalog,
    };
    words::select_candidates(source, catalog, count, &mut rand::rng())
}

/// Uniform pick among the pending candidates.
fn auto_pick(choices: &[String]) -> Option<String> {
    choices.choose(&mut rand::rng()).cloned()
}

/// Spawns a room session.
///
/// With a `host`, the session starts with the host as its only member and
/// round one already under way. Without one (a revival), it starts empty
/// and the first join starts round one.
pub(crate) fn spawn_room<S: Store, B: Broadcaster>(
    code: RoomCode,
    shared: Shared<S, B>,
    host: Option<UserId>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(shared.config.command_channel_size);
    let session_id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);

    let session = RoomSession {
        code: code.clone(),
        session_id,
        shared,
        players: VecDeque::new(),
        phase: RoundPhase::ChoosingWord,
        round: 0,
        current_word: None,
        pending_choices: Vec::new(),
        strokes: Vec::new(),
        started_at: Instant::now(),
        scheduler: TurnScheduler::new(),
        receiver: rx,
    };

    tokio::spawn(session.run(host));

    RoomHandle {
        code,
        session_id,
        sender: tx,
    }
}

//! `LudoClient`: one participant's handle on a room.
//!
//! The client owns its local view of the shared record (through a
//! [`SyncChannel`]) and exposes every room and match operation as a typed
//! call. Each mutating call is one commit: the change is applied to a private
//! copy of the latest snapshot and published whole, so other clients only
//! ever see complete transitions.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ludo_core::{LudoClient, LudoConfig, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut host = LudoClient::new(store.clone(), LudoConfig::default().with_seed(1));
//! let mut guest = LudoClient::new(store, LudoConfig::default().with_seed(2));
//!
//! let room = host.create_room("Alice").unwrap();
//! guest.join_room(&room.invite_code.to_lowercase(), "Bob").unwrap();
//! host.set_player_ready(true).unwrap();
//! guest.set_player_ready(true).unwrap();
//! host.start_game().unwrap();
//!
//! guest.sync_game_state().unwrap();
//! assert!(host.can_roll());
//! assert!(!guest.can_roll());
//! ```

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::core::{
    Color, DiceSource, GameRng, GameState, JoinError, LudoConfig, LudoError, MoveRecord, PieceId,
    Player, PlayerId, RoomError, SyncError, TurnError,
};
use crate::game::{policy_for, GameEngine, MovePolicy, RollOutcome};
use crate::room::{code, Room, RoomId, Snapshot};
use crate::rules::{LudoRules, MoveList};
use crate::sync::{
    spawn_poller, PollStatus, PollTarget, PollerHandle, Reconciled, SnapshotStore, SyncChannel,
};

/// Fresh codes tried before `create_room` gives up.
const MAX_CODE_ATTEMPTS: usize = 64;

/// What one `drive_bots` call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotStep {
    /// Not a bot's turn, or nothing to drive.
    Idle,
    /// A bot rolled.
    Rolled(RollOutcome),
    /// A bot moved a piece.
    Moved(MoveRecord),
}

/// One participant's view of, and operations on, a shared room.
pub struct LudoClient {
    store: Arc<dyn SnapshotStore>,
    config: LudoConfig,
    engine: GameEngine,
    player_id: PlayerId,
    channel: Option<SyncChannel>,
    ids: GameRng,
    codes: GameRng,
    bot_rng: GameRng,
    dice: Box<dyn DiceSource + Send>,
    policy: Box<dyn MovePolicy>,
}

impl std::fmt::Debug for LudoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LudoClient")
            .field("player_id", &self.player_id)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl LudoClient {
    /// Client rolling dice from the configured seed (or entropy).
    pub fn new(store: Arc<dyn SnapshotStore>, config: LudoConfig) -> Self {
        let dice = Self::root_rng(&config).for_context("dice");
        Self::with_dice(store, config, dice)
    }

    /// Client with an injected dice source.
    pub fn with_dice(
        store: Arc<dyn SnapshotStore>,
        config: LudoConfig,
        dice: impl DiceSource + Send + 'static,
    ) -> Self {
        let root = Self::root_rng(&config);
        let mut ids = root.for_context("ids");
        let player_id = PlayerId::new(ids.gen_u64());
        Self {
            store,
            engine: GameEngine::new(LudoRules::new(config.clone())),
            player_id,
            channel: None,
            ids,
            codes: root.for_context("codes"),
            bot_rng: root.for_context("bots"),
            dice: Box::new(dice),
            policy: policy_for(config.bot_policy),
            config,
        }
    }

    fn root_rng(config: &LudoConfig) -> GameRng {
        config.seed.map(GameRng::new).unwrap_or_else(GameRng::from_entropy)
    }

    // === Accessors ===

    #[must_use]
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    #[must_use]
    pub fn config(&self) -> &LudoConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Local view of the room, if in one.
    #[must_use]
    pub fn room(&self) -> Option<&Room> {
        self.channel.as_ref().map(|c| &c.snapshot().room)
    }

    /// Local view of the match, if one has started.
    #[must_use]
    pub fn game(&self) -> Option<&GameState> {
        self.channel.as_ref().and_then(|c| c.snapshot().game.as_ref())
    }

    /// Version of the local view.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.channel.as_ref().map(SyncChannel::version)
    }

    #[must_use]
    pub fn my_color(&self) -> Option<Color> {
        self.channel
            .as_ref()
            .and_then(|c| c.snapshot().color_of(self.player_id))
    }

    #[must_use]
    pub fn is_host(&self) -> bool {
        self.room().map(|r| r.is_host(self.player_id)).unwrap_or(false)
    }

    // === Room lifecycle ===

    /// Open a new room with this client as host.
    pub fn create_room(&mut self, host_name: &str) -> Result<Room, LudoError> {
        if self.channel.is_some() {
            return Err(RoomError::AlreadyInRoom.into());
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let invite_code = code::generate(&mut self.codes);
            if self.store.contains(&invite_code)? {
                debug!("Invite code {} taken, drawing another", invite_code);
                continue;
            }
            let room = Room::new(
                RoomId(self.ids.gen_u64()),
                invite_code.as_str(),
                self.player_id,
                host_name,
            );
            match SyncChannel::open(self.store.clone(), Snapshot::new(room.clone())) {
                Ok(channel) => {
                    info!("{} created room {}", host_name, invite_code);
                    self.channel = Some(channel);
                    return Ok(room);
                }
                // Another client claimed the code between the check and the write
                Err(SyncError::StaleVersion { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(SyncError::Unavailable("no free invite code".into()).into())
    }

    /// Join a waiting room by invite code (case-insensitive).
    pub fn join_room(&mut self, invite_code: &str, name: &str) -> Result<Room, LudoError> {
        if self.channel.is_some() {
            return Err(RoomError::AlreadyInRoom.into());
        }
        let invite_code = code::normalize(invite_code);
        if !code::is_valid(&invite_code) {
            return Err(JoinError::RoomNotFound(invite_code).into());
        }

        let mut channel = match SyncChannel::attach(self.store.clone(), &invite_code) {
            Ok(channel) => channel,
            Err(SyncError::RoomClosed(_)) => {
                return Err(JoinError::RoomNotFound(invite_code).into())
            }
            Err(e) => return Err(e.into()),
        };

        let id = self.player_id;
        let joined = channel.commit(|snap| -> Result<Player, LudoError> {
            if snap.room.player(id).is_some() {
                return Err(RoomError::AlreadyInRoom.into());
            }
            snap.room.join(id, name).map_err(LudoError::from)
        });
        match joined {
            Ok(_) => {}
            Err(LudoError::Sync(SyncError::RoomClosed(closed))) => {
                return Err(JoinError::RoomNotFound(closed).into())
            }
            Err(e) => return Err(e),
        }

        let room = channel.snapshot().room.clone();
        self.channel = Some(channel);
        Ok(room)
    }

    /// Leave the current room.
    ///
    /// Host role passes on; an emptied room is discarded. Mid-match the
    /// leaver's turns are skipped from now on. A room that has already
    /// disappeared counts as left.
    pub fn leave_room(&mut self) -> Result<(), LudoError> {
        let mut channel = self.channel.take().ok_or(RoomError::NotInRoom)?;
        let id = self.player_id;
        match channel.commit(|snap| snap.leave(id).map_err(LudoError::from)) {
            Ok(_) | Err(LudoError::Sync(SyncError::RoomClosed(_))) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn set_player_ready(&mut self, ready: bool) -> Result<(), LudoError> {
        let id = self.player_id;
        self.channel_mut()?
            .commit(|snap| snap.room.set_ready(id, ready).map_err(LudoError::from))
    }

    /// Host-only: seat a bot on the next free color.
    pub fn add_bot(&mut self, name: &str) -> Result<Player, LudoError> {
        let caller = self.player_id;
        let bot_id = PlayerId::new(self.ids.gen_u64());
        self.channel_mut()?
            .commit(|snap| snap.room.add_bot(caller, bot_id, name).map_err(LudoError::from))
    }

    /// Host-only: remove a bot seat.
    pub fn remove_bot(&mut self, bot_id: PlayerId) -> Result<Player, LudoError> {
        let caller = self.player_id;
        self.channel_mut()?
            .commit(|snap| snap.room.remove_bot(caller, bot_id).map_err(LudoError::from))
    }

    /// Host-only: start the match once at least two seats are all ready.
    pub fn start_game(&mut self) -> Result<(), LudoError> {
        let caller = self.player_id;
        self.channel_mut()?.commit(|snap| {
            snap.start_game(caller)
                .map(|_| ())
                .map_err(LudoError::from)
        })
    }

    // === Sync ===

    /// Adopt the remote room record if it is newer than the local view.
    ///
    /// If the room has been discarded the local view is dropped and
    /// `RoomClosed` is returned.
    pub fn sync_room(&mut self) -> Result<Reconciled, LudoError> {
        let channel = self.channel_mut()?;
        match channel.reconcile() {
            Ok(outcome) => Ok(outcome),
            Err(SyncError::RoomClosed(closed)) => {
                info!("Room {} closed", closed);
                self.channel = None;
                Err(SyncError::RoomClosed(closed).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Adopt the remote match state if newer.
    ///
    /// Room and match travel in one snapshot, so this is the same pass as
    /// [`sync_room`](Self::sync_room).
    pub fn sync_game_state(&mut self) -> Result<Reconciled, LudoError> {
        self.sync_room()
    }

    // === Match ===

    /// True iff this client's color may roll now.
    #[must_use]
    pub fn can_roll(&self) -> bool {
        match (self.game(), self.my_color()) {
            (Some(game), Some(color)) => self.engine.can_roll(game, color),
            _ => false,
        }
    }

    /// Roll for this client's color.
    pub fn roll_dice(&mut self) -> Result<RollOutcome, LudoError> {
        let color = self.seated_color()?;
        let engine = &self.engine;
        let dice = &mut self.dice;
        let channel = self.channel.as_mut().ok_or(RoomError::NotInRoom)?;
        channel.commit(|snap| -> Result<RollOutcome, LudoError> {
            let game = snap.game.as_mut().ok_or(TurnError::NoGame)?;
            Ok(engine.roll_dice(game, color, &mut **dice)?)
        })
    }

    /// Pieces of the color holding the turn that may move with the committed
    /// die. Empty before a roll or outside a match.
    #[must_use]
    pub fn valid_moves(&self) -> MoveList {
        self.game()
            .map(|game| self.engine.valid_moves(game))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn can_move_piece(&self, piece: PieceId) -> bool {
        match (self.game(), self.my_color()) {
            (Some(game), Some(color)) => self.engine.can_move_piece(game, color, piece),
            _ => false,
        }
    }

    /// Move one of this client's pieces with the committed die.
    pub fn move_piece(&mut self, piece: PieceId) -> Result<MoveRecord, LudoError> {
        let color = self.seated_color()?;
        let engine = &self.engine;
        let channel = self.channel.as_mut().ok_or(RoomError::NotInRoom)?;
        channel.commit(|snap| -> Result<MoveRecord, LudoError> {
            let game = snap.game.as_mut().ok_or(TurnError::NoGame)?;
            Ok(engine.move_piece(game, color, piece)?)
        })
    }

    /// Host-only: take one step for the bot holding the turn.
    ///
    /// Rolls if the bot has not rolled yet, otherwise moves the piece its
    /// policy picks. Returns `Idle` when the turn belongs to a human or the
    /// match is not running.
    pub fn drive_bots(&mut self) -> Result<BotStep, LudoError> {
        if !self.is_host() {
            return Err(RoomError::NotHost.into());
        }
        let Some(game) = self.game() else {
            return Ok(BotStep::Idle);
        };
        let color = game.current_turn;
        let bot_turn = game.player_for(color).map(|p| p.is_bot).unwrap_or(false);
        if game.is_over() || !bot_turn {
            return Ok(BotStep::Idle);
        }

        let engine = &self.engine;
        let dice = &mut self.dice;
        let policy = &self.policy;
        let rng = &mut self.bot_rng;
        let channel = self.channel.as_mut().ok_or(RoomError::NotInRoom)?;
        channel.commit(|snap| -> Result<BotStep, LudoError> {
            let game = snap.game.as_mut().ok_or(TurnError::NoGame)?;
            // The remote may have moved on since the local check
            let still_bot = game.player_for(game.current_turn).map(|p| p.is_bot).unwrap_or(false);
            if game.is_over() || !still_bot {
                return Ok(BotStep::Idle);
            }
            let color = game.current_turn;
            if game.dice_value.is_none() {
                let outcome = engine.roll_dice(game, color, &mut **dice)?;
                return Ok(BotStep::Rolled(outcome));
            }
            match policy.choose(engine.rules(), game, color, rng) {
                Some(piece) => Ok(BotStep::Moved(engine.move_piece(game, color, piece)?)),
                None => Ok(BotStep::Idle),
            }
        })
    }

    /// Start the background poll loop for a shared client.
    ///
    /// Each tick reconciles with the store and, on the host, advances bots.
    /// The loop ends when the handle is stopped or dropped, the client
    /// leaves, the room closes or the match finishes. Must be called from
    /// within a tokio runtime.
    pub fn start_polling(client: &Arc<Mutex<LudoClient>>) -> Result<PollerHandle, LudoError> {
        let period = client
            .lock()
            .map_err(|_| SyncError::Unavailable("client lock poisoned".into()))?
            .config
            .poll_interval();
        Ok(spawn_poller(client.clone(), period))
    }

    // === Internals ===

    fn channel_mut(&mut self) -> Result<&mut SyncChannel, RoomError> {
        self.channel.as_mut().ok_or(RoomError::NotInRoom)
    }

    fn seated_color(&self) -> Result<Color, LudoError> {
        if self.channel.is_none() {
            return Err(RoomError::NotInRoom.into());
        }
        self.my_color().ok_or_else(|| RoomError::NoSuchPlayer.into())
    }
}

impl PollTarget for LudoClient {
    fn poll_once(&mut self) -> PollStatus {
        if self.channel.is_none() {
            return PollStatus::Stop;
        }
        match self.sync_room() {
            Ok(_) => {}
            Err(LudoError::Sync(SyncError::RoomClosed(_))) => return PollStatus::Stop,
            Err(e) => {
                warn!("Poll failed: {}", e);
                return PollStatus::Continue;
            }
        }

        if self.is_host() {
            match self.drive_bots() {
                Ok(BotStep::Idle) => {}
                Ok(step) => debug!("Bot step: {:?}", step),
                Err(e) => debug!("Bot step skipped: {}", e),
            }
        }

        match self.game() {
            Some(game) if game.is_over() => PollStatus::Stop,
            _ => PollStatus::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PiecePosition, ScriptedDice};
    use crate::sync::MemoryStore;

    fn client(store: &Arc<MemoryStore>, seed: u64) -> LudoClient {
        LudoClient::new(store.clone(), LudoConfig::default().with_seed(seed))
    }

    fn scripted(store: &Arc<MemoryStore>, seed: u64, rolls: &[u8]) -> LudoClient {
        LudoClient::with_dice(
            store.clone(),
            LudoConfig::default().with_seed(seed),
            ScriptedDice::new(rolls.to_vec()),
        )
    }

    #[test]
    fn test_create_room_makes_host() {
        let store = Arc::new(MemoryStore::new());
        let mut host = client(&store, 1);
        let room = host.create_room("Alice").unwrap();
        assert!(code::is_valid(&room.invite_code));
        assert!(host.is_host());
        assert_eq!(host.my_color(), Some(Color::Red));
        assert!(!room.players[0].is_ready);
        assert_eq!(
            host.create_room("Again").unwrap_err(),
            LudoError::Room(RoomError::AlreadyInRoom)
        );
    }

    #[test]
    fn test_join_unknown_code() {
        let store = Arc::new(MemoryStore::new());
        let mut guest = client(&store, 2);
        assert_eq!(
            guest.join_room("zzzzzz", "Bob").unwrap_err(),
            LudoError::Join(JoinError::RoomNotFound("ZZZZZZ".into()))
        );
        assert!(guest.room().is_none());
    }

    #[test]
    fn test_operations_outside_room() {
        let store = Arc::new(MemoryStore::new());
        let mut lone = client(&store, 3);
        assert_eq!(
            lone.set_player_ready(true).unwrap_err(),
            LudoError::Room(RoomError::NotInRoom)
        );
        assert_eq!(lone.roll_dice().unwrap_err(), LudoError::Room(RoomError::NotInRoom));
        assert!(!lone.can_roll());
        assert!(lone.valid_moves().is_empty());
    }

    #[test]
    fn test_host_plays_against_bot() {
        let store = Arc::new(MemoryStore::new());
        let mut host = scripted(&store, 4, &[6, 3]);
        host.create_room("Alice").unwrap();
        let bot = host.add_bot("Bot 1").unwrap();
        assert_eq!(bot.color, Color::Blue);
        host.set_player_ready(true).unwrap();
        host.start_game().unwrap();

        assert_eq!(host.drive_bots().unwrap(), BotStep::Idle);
        let roll = host.roll_dice().unwrap();
        assert_eq!(roll.value, 6);
        assert!(host.can_move_piece(PieceId(0)));
        let record = host.move_piece(PieceId(0)).unwrap();
        assert!(record.kept_turn);
        assert_eq!(
            host.game().unwrap().piece(Color::Red, PieceId(0)).unwrap().position,
            PiecePosition::OnTrack(0)
        );

        // 3 moves the entered piece and passes to the bot
        host.roll_dice().unwrap();
        host.move_piece(PieceId(0)).unwrap();
        assert_eq!(host.game().unwrap().current_turn, Color::Blue);

        match host.drive_bots().unwrap() {
            BotStep::Rolled(outcome) => assert_eq!(outcome.color, Color::Blue),
            other => panic!("expected a bot roll, got {other:?}"),
        }
    }

    #[test]
    fn test_drive_bots_host_only() {
        let store = Arc::new(MemoryStore::new());
        let mut host = client(&store, 5);
        let room = host.create_room("Alice").unwrap();
        let mut guest = client(&store, 6);
        guest.join_room(&room.invite_code, "Bob").unwrap();
        assert_eq!(guest.drive_bots().unwrap_err(), LudoError::Room(RoomError::NotHost));
    }
}

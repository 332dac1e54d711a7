//! Room lifecycle: joining, leaving, readiness, bots and game start.
//!
//! Every operation validates fully before it mutates, so a refused call
//! leaves the room exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::record::{Room, RoomStatus};
use crate::core::{Color, GameState, JoinError, Player, PlayerId, RoomError};

impl Room {
    /// Seat a new human on the next free color.
    pub fn join(&mut self, id: PlayerId, name: impl Into<String>) -> Result<Player, JoinError> {
        if !self.is_waiting() {
            return Err(JoinError::AlreadyStarted);
        }
        let color = self.next_free_color().ok_or(JoinError::RoomFull)?;
        let player = Player::human(id, name, color);
        self.players.push(player.clone());
        info!("{} joined {} as {}", player.name, self.invite_code, color);
        Ok(player)
    }

    /// Remove a seat, re-electing the host if needed.
    ///
    /// The host role passes to the next human in join order. A room left with
    /// only bots is emptied so it can be discarded.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, RoomError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(RoomError::NoSuchPlayer)?;
        let departed = self.players.remove(index);

        if departed.is_host {
            let heir = self.humans().next().map(|p| p.id);
            match heir {
                Some(heir) => {
                    self.host_id = heir;
                    if let Some(next) = self.players.iter_mut().find(|p| p.id == heir) {
                        next.is_host = true;
                        info!("{} is now host of {}", next.name, self.invite_code);
                    }
                }
                None => self.players.clear(),
            }
        }
        info!("{} left {}", departed.name, self.invite_code);
        Ok(departed)
    }

    /// Update a player's readiness while the room is waiting.
    pub fn set_ready(&mut self, id: PlayerId, ready: bool) -> Result<(), RoomError> {
        if !self.is_waiting() {
            return Err(RoomError::NotWaiting);
        }
        let player = self.player_mut(id).ok_or(RoomError::NoSuchPlayer)?;
        player.is_ready = ready;
        Ok(())
    }

    /// Host-only: seat a bot on the next free color.
    pub fn add_bot(
        &mut self,
        caller: PlayerId,
        bot_id: PlayerId,
        name: impl Into<String>,
    ) -> Result<Player, RoomError> {
        self.require_waiting_host(caller)?;
        let color = self.next_free_color().ok_or(RoomError::RoomFull)?;
        let bot = Player::bot(bot_id, name, color);
        self.players.push(bot.clone());
        info!("Bot {} seated on {} in {}", bot.name, color, self.invite_code);
        Ok(bot)
    }

    /// Host-only: remove a bot seat. Refuses human targets.
    pub fn remove_bot(&mut self, caller: PlayerId, bot_id: PlayerId) -> Result<Player, RoomError> {
        self.require_waiting_host(caller)?;
        match self.player(bot_id) {
            None => return Err(RoomError::NoSuchPlayer),
            Some(p) if !p.is_bot => return Err(RoomError::NotABot),
            Some(_) => {}
        }
        self.remove_player(bot_id)
    }

    fn require_waiting_host(&self, caller: PlayerId) -> Result<(), RoomError> {
        if self.player(caller).is_none() {
            return Err(RoomError::NotInRoom);
        }
        if !self.is_host(caller) {
            return Err(RoomError::NotHost);
        }
        if !self.is_waiting() {
            return Err(RoomError::NotWaiting);
        }
        Ok(())
    }
}

/// A room together with its match, published as one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub room: Room,
    pub game: Option<GameState>,
}

impl Snapshot {
    #[must_use]
    pub fn new(room: Room) -> Self {
        Self { room, game: None }
    }

    /// Color seated by a player.
    #[must_use]
    pub fn color_of(&self, id: PlayerId) -> Option<Color> {
        self.room.player(id).map(|p| p.color)
    }

    /// No seats left; the room should be discarded.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.room.players.is_empty()
    }

    /// Host-only: start the match.
    ///
    /// Needs at least two seats, all ready. On success the room switches to
    /// playing and the opening `GameState` is built from its seats.
    pub fn start_game(&mut self, caller: PlayerId) -> Result<&GameState, RoomError> {
        self.room.require_waiting_host(caller)?;
        if self.room.players.len() < 2 {
            return Err(RoomError::InsufficientPlayers);
        }
        if !self.room.all_ready() {
            return Err(RoomError::NotAllReady);
        }

        let game = GameState::new(self.room.players.iter().cloned());
        self.room.status = RoomStatus::Playing;
        info!(
            "Game started in {} with {} players; {} opens",
            self.room.invite_code,
            self.room.players.len(),
            game.current_turn
        );
        Ok(&*self.game.insert(game))
    }

    /// Remove a player from the room and, mid-match, from the game.
    ///
    /// The leaver's pieces stay on the board; their turns are skipped.
    pub fn leave(&mut self, id: PlayerId) -> Result<Player, RoomError> {
        let departed = self.room.remove_player(id)?;
        if let Some(game) = self.game.as_mut() {
            game.remove_player(departed.color);
            // Bots dropped along with the last human leave the match too
            let remaining: Vec<Color> = self.room.players.iter().map(|p| p.color).collect();
            for color in game.colors() {
                if !remaining.contains(&color) && game.is_seated(color) {
                    game.remove_player(color);
                }
            }
        }
        Ok(departed)
    }
}

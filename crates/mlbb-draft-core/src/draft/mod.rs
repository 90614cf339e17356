// Draft engine: schedule, slots, lane and player resolution, validation.

pub mod availability;
pub mod lane;
pub mod player;
pub mod record;
pub mod session;
pub mod step;
pub mod validate;

pub use lane::Lane;
pub use player::{PlayerResolution, RosterPlayer, TeamRoster};
pub use record::{DraftRecord, HeroSlot, MatchMeta, Objectives, PickSlot, TeamDraft};
pub use session::{BanChoice, DraftSession, PendingPick, SessionState, SlotEdit, SlotOutcome};
pub use step::{ActionKind, DraftStep, Phase, Team};
pub use validate::{ValidationContext, ValidationError};

//! Match orchestration for hosts.
//!
//! ## Key Components
//!
//! - [`MatchController`]: phase-gated actions, battle dealing, UI flags
//! - [`MatchSnapshot`]: serializable read-only view of a match
//! - [`MatchObserver`]: change notification hook
//! - [`AutoPlayer`]: plays whole matches with a [`PlayerStrategy`]
//!
//! ## Example
//!
//! ```
//! use war_of_attrition::controller::{ChallengeResponse, MatchController};
//! use war_of_attrition::core::{MatchConfig, Phase, Side};
//!
//! let mut controller = MatchController::new(MatchConfig::default().with_seed(7)).unwrap();
//!
//! while !controller.state().is_over() {
//!     match controller.state().phase() {
//!         Phase::Normal => {
//!             controller.reveal_turn().unwrap();
//!         }
//!         Phase::Challenge if controller.challenge_offered() => {
//!             if let ChallengeResponse::Accepted { .. } = controller.respond_to_challenge(true).unwrap() {
//!                 controller.submit_challenge_card().unwrap();
//!             }
//!         }
//!         Phase::Challenge => {
//!             controller.submit_challenge_card().unwrap();
//!         }
//!         Phase::Battle => {
//!             let card = controller.battle_hand(Side::Player)[0];
//!             controller.select_battle_card(card).unwrap();
//!         }
//!         _ => break,
//!     }
//! }
//!
//! assert!(controller.state().is_over());
//! ```

pub mod autoplay;
pub mod match_controller;
pub mod observer;
pub mod snapshot;

pub use autoplay::{AutoPlayer, GreedyStrategy, MatchReport, MatchTally, PlayerStrategy, RandomStrategy};
pub use match_controller::{ChallengeResponse, MatchController};
pub use observer::MatchObserver;
pub use snapshot::{BattleSubPhase, MatchSnapshot, TurnView};

//! `dyslexia_sim` - real-time text distortion engine
//!
//! Simulates reading difficulties by continuously distorting a document:
//! similar letters swap for a moment, long words pulse in and out of blur,
//! and words are replaced by similar-looking ones. Every distortion is
//! temporary and every word keeps a reserved width, so the surrounding text
//! never reflows.
//!
//! The engine runs on virtual time. Drive it by calling
//! [`Simulator::advance_to`] once per frame, then render
//! [`Simulator::render_units`] as span markup ([`render::to_markup`]) or
//! into a terminal [`CellBuffer`] ([`render::TextSurface`]).
//!
//! ```
//! use dyslexia_sim::{EngineConfig, Rule, Simulator};
//! use dyslexia_sim::render::TextSurface;
//! use std::time::Duration;
//!
//! let mut sim = Simulator::new(EngineConfig::default())?.with_seed(1);
//! sim.set_text("Meglio leggere lentamente");
//! sim.set_rule(Rule::BlurPulse, true);
//! sim.advance_by(Duration::from_millis(500));
//!
//! let frame = TextSurface::new(40).render(&sim.render_units());
//! assert_eq!(frame.height(), 1);
//! # Ok::<(), dyslexia_sim::Error>(())
//! ```

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for color math
#![allow(clippy::cast_possible_wrap)] // Intentional coordinate conversions
#![allow(clippy::module_name_repetitions)] // Allow Cell::CellContent etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::format_push_string)] // format! with push_str is fine
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::branches_sharing_code)] // Code clarity over DRY in branching
#![allow(clippy::inherent_to_string)] // to_string methods are convenient
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod config;
pub mod dictionary;
pub mod effects;
pub mod engine;
pub mod error;
pub mod event;
pub mod render;
pub mod schedule;
pub mod style;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use config::{BlurPulseConfig, EngineConfig, LetterSwapConfig, WordSwapConfig};
pub use dictionary::SubstitutionDictionary;
pub use effects::{EffectController, Rule, Rules};
pub use engine::Simulator;
pub use error::{Error, Result};
pub use event::{
    LogLevel, clear_event_callback, clear_log_callback, emit_event, emit_log, set_event_callback,
    set_log_callback,
};

// Re-export rendering types
pub use ansi::{AnsiWriter, ColorMode};
pub use buffer::CellBuffer;
pub use cell::{Cell, CellContent};
pub use color::Rgba;
pub use style::{Style, TextAttributes, Theme};
pub use unicode::WidthMethod;

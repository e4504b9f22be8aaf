//! Lumen Photonic Circuit Model
//!
//! This crate provides the core data structures for describing linear-optical
//! circuits in Lumen. It is the foundation the code generators and the
//! execution gateway build on.
//!
//! # Overview
//!
//! A [`Circuit`] is a set of placed [`Operation`]s spread over a small number
//! of optical modes. Each operation has a [`ModeId`] and a position that
//! orders it within its mode; positions on different modes are unrelated.
//! The [`OperationKind`] catalog describes every optical primitive: its
//! label, default parameters, arity, and which [`Framework`]s support it.
//!
//! # Core Components
//!
//! - **Catalog**: [`OperationKind`], [`Framework`], [`Arity`], [`DocSection`]
//! - **Modes**: [`ModeId`] and the mode-count bounds
//! - **Operations**: [`Operation`], [`OperationId`], [`Parameters`]
//! - **Circuit**: [`Circuit`], a mutation API that never fails
//! - **Store**: [`CircuitStore`], an owner of the working circuit that
//!   publishes [`CircuitEvent`]s to observers
//!
//! # Example: A Simple Interferometer
//!
//! ```rust
//! use lumen_ir::{Circuit, OperationKind};
//!
//! let mut circuit = Circuit::new();
//! circuit.add_operation(OperationKind::Laser, 0, None);
//! circuit.add_operation(OperationKind::BeamSplitter, 0, None);
//!
//! assert_eq!(circuit.mode_count(), 2);
//! assert_eq!(circuit.by_mode()[0].len(), 2);
//! ```
//!
//! # Operation Catalog
//!
//! | Kind | Modes | Strawberry Fields | Perceval |
//! |------|-------|-------------------|----------|
//! | `Laser` | 1 | yes | no |
//! | `Beam Splitter` | 2 | yes | yes |
//! | `Phase Shifter` | 1 | yes | yes |
//! | `Squeezing Gate` | 1 | yes | no |
//! | `Displacement Gate` | 1 | yes | no |
//! | `Kerr Gate` | 1 | yes | no |
//! | `Photonic Measurement` | 1 | yes | yes |
//! | `Half Wave Plate` | 1 | no | yes |
//! | `Quarter Wave Plate` | 1 | no | yes |
//! | `Permutation` | 2 | no | yes |
//! | `Polarizing Beam Splitter` | 2 | no | yes |
//! | `Time Delay` | 1 | no | yes |
//! | `Unitary` | 2 | no | yes |

pub mod catalog;
pub mod circuit;
pub mod error;
pub mod mode;
pub mod operation;
pub mod store;

pub use catalog::{Arity, DocSection, Framework, OperationKind, parameter_display_name};
pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use mode::{DEFAULT_MODES, MAX_MODES, MIN_MODES, ModeId};
pub use operation::{Operation, OperationId, Parameters};
pub use store::{CircuitEvent, CircuitStore};

/// Number of shots used when nothing else is configured.
pub const DEFAULT_SHOTS: u32 = 1000;

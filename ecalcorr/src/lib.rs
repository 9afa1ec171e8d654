#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

//! `ecalcorr` corrects electron energies with tabulated scale and smearing corrections and
//! computes robust statistics of distributions with bootstrap uncertainties.
//!
//! Corrections are stored in [`correction::CorrectionTable`]s keyed by range categories
//! ([`category::CategoryKey`]) and queried through [`service::EnergyScaleCorrection`]:
//!
//! ```rust
//! use ecalcorr::config::{ScaleFormat, SmearingFormat};
//! use ecalcorr::reader;
//! use ecalcorr::service::{EnergyScaleCorrection, Measurement};
//!
//! let scales = "100 200 0.0 1.0 0.9 1.5 30.0 9999 12 1.02 0.01\n";
//! let smearings = "absEta_0_1-gold 6.60 0.1 0.0074 0.0006 0.3 0.02\n";
//!
//! let service = EnergyScaleCorrection::new(
//!     reader::read_scales(scales.as_bytes(), ScaleFormat::Numeric).unwrap(),
//!     reader::read_smearings(smearings.as_bytes(), SmearingFormat::Compact).unwrap(),
//! )
//! .unwrap();
//!
//! let electron = Measurement::from_raw(150, true, 0.95, -0.4, 45.0, 12);
//! assert_eq!(service.scale(&electron).unwrap(), 1.02);
//! assert!(service.smearing_sigma(&electron, 0.0, 0.0).unwrap() > 0.0);
//! ```

mod convert;

pub mod bin;
pub mod bootstrap;
pub mod category;
pub mod config;
pub mod correction;
pub mod error;
pub mod histogram;
pub mod profile;
pub mod reader;
pub mod service;
pub mod statistic;

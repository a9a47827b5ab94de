// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval-augmented orchestration for the EstateWise assistant.
//!
//! A turn flows through four stages:
//! 1. [`decision::DecisionGate`] asks the backend whether property data is needed.
//! 2. [`retrieval::RetrievalFanOut`] fetches it, when needed.
//! 3. [`assembler::assemble_context`] merges it into the caller's context.
//! 4. [`orchestrator::EstateWiseAgent`] forwards the result to the expert pipeline.

pub mod assembler;
pub mod decision;
pub mod orchestrator;
pub mod recording;
pub mod retrieval;

pub use assembler::{PROPERTY_DATA_END, PROPERTY_DATA_START, assemble_context};
pub use decision::{DecisionGate, parse_decision};
pub use orchestrator::{AgentSettings, EstateWiseAgent};
pub use retrieval::{RETRIEVAL_LIMIT, RetrievalFanOut, RetrievedProperties};

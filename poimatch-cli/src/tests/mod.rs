//! Shared test harness modules for the poimatch CLI.

use super::*;

mod resolve_unit;

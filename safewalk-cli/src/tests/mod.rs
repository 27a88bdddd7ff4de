//! Shared test harness modules for the Safewalk CLI.

use super::*;
use crate::features::*;

mod blockers;
mod common;

// A simple module to define the time types used in the project
//
// The engine lives on the discrete time axis the host scheduler advances on.
// It NEVER reads a system clock: every entry point receives the current
// period through its call context, so results stay deterministic and
// replayable across hosts.

// Scheduler time-units used to determine it using its type
pub type Period = u64;

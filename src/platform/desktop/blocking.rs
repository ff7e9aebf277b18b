/// Runs a collaborator call issued from a UI callback. The desktop shell
/// executes it inline on the callback; only the initiating handler waits,
/// the rendering surface stays live.
pub fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    f()
}

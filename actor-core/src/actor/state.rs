#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ActorState {
    Init,
    Started,
    Terminating,
    CanTerminate,
    Terminated,
}

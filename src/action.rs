#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
  HideHelp,
  None,
  OpenThread,
  Quit,
  ShowHelp,
}

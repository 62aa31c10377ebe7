/// A player command fed to [`GameSession::tick`](crate::GameSession::tick).
///
/// Front ends translate their own key or button events into this closed set; the
/// engine never sees raw device input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Input {
    /// Shift the falling piece one column left.
    MoveLeft,
    /// Shift the falling piece one column right.
    MoveRight,
    /// Move the falling piece down one row. Never locks it.
    SoftDrop,
    /// Rotate the falling piece clockwise, with wall kicks.
    Rotate,
    /// End the session loop.
    Quit,
}

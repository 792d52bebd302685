use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    /// Bracketed paste; lands in the entry editor.
    Pasted(String),
    Resize,
    AppStarted,
}

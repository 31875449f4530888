mod terminal;

pub use terminal::{TerminalObserver, TerminalPresenter, parse_signal, print_favorites};

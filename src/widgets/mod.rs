/// List-backed widget models, independent of the terminal backend

pub mod error_box;
pub mod help;
pub mod rows;
pub mod signals;
pub mod table;

pub use error_box::ErrorBox;
pub use help::HelpMenu;
pub use rows::{ContainerRow, ProcessRow, SystemRow};
pub use signals::SignalList;
pub use table::{Scrollable, SortSpec, TableModel, TableRow, TextRow, Tone, Viewport};

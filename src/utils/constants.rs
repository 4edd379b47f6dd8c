/// Table layouts, key bindings and signal definitions

/// Marks the active ascending sort column
pub const UP_ARROW: &str = "▲";
/// Marks the active descending sort column
pub const DOWN_ARROW: &str = "▼";

/// Default display refresh rate in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 1000;
/// Anything faster makes the collector outrun sysinfo's CPU deltas
pub const MIN_REFRESH_MS: u64 = 100;

/// Columns of the process table, sortable with keys 1-8 / F1-F8
pub const PROC_HEADER: [&str; 8] = [
    "PID",
    "Command",
    "CPU",
    "Memory",
    "Status",
    "Block I/O",
    "Creation Time",
    "Thread Count",
];

/// Columns of the per-container table
pub const CONTAINER_HEADER: [&str; 8] = [
    "ID",
    "Image",
    "Name",
    "Status",
    "CPU",
    "Memory",
    "Net I/O",
    "Block I/O",
];

/// Columns of the host metrics table
pub const SYSTEM_HEADER: [&str; 4] = ["Device", "Kind", "Usage", "Detail"];

/// Columns of the per-core table shown by `system --cpuinfo`
pub const CPU_HEADER: [&str; 4] = ["Core", "Usage", "Frequency", "Load"];

/// Signals offered by the kill prompt, numbered as on Linux
pub const SIGNALS: [(i32, &str, &str); 31] = [
    (1, "SIGHUP", "Hangup"),
    (2, "SIGINT", "Interrupt"),
    (3, "SIGQUIT", "Quit"),
    (4, "SIGILL", "Illegal instruction"),
    (5, "SIGTRAP", "Trace trap"),
    (6, "SIGABRT", "Abort"),
    (7, "SIGBUS", "Bus error"),
    (8, "SIGFPE", "Floating point exception"),
    (9, "SIGKILL", "Kill"),
    (10, "SIGUSR1", "User signal 1"),
    (11, "SIGSEGV", "Segmentation fault"),
    (12, "SIGUSR2", "User signal 2"),
    (13, "SIGPIPE", "Broken pipe"),
    (14, "SIGALRM", "Alarm clock"),
    (15, "SIGTERM", "Terminate"),
    (16, "SIGSTKFLT", "Stack fault"),
    (17, "SIGCHLD", "Child status changed"),
    (18, "SIGCONT", "Continue"),
    (19, "SIGSTOP", "Stop"),
    (20, "SIGTSTP", "Terminal stop"),
    (21, "SIGTTIN", "Background read from tty"),
    (22, "SIGTTOU", "Background write to tty"),
    (23, "SIGURG", "Urgent socket condition"),
    (24, "SIGXCPU", "CPU limit exceeded"),
    (25, "SIGXFSZ", "File size limit exceeded"),
    (26, "SIGVTALRM", "Virtual alarm clock"),
    (27, "SIGPROF", "Profiling alarm clock"),
    (28, "SIGWINCH", "Window size change"),
    (29, "SIGIO", "I/O now possible"),
    (30, "SIGPWR", "Power failure restart"),
    (31, "SIGSYS", "Bad system call"),
];

/// Signal sent by the kill shortcut inside the prompt
pub const SIGTERM: i32 = 15;

/// Leading digits that can start a two-digit signal number
pub const TWO_DIGIT_PREFIXES: [char; 3] = ['1', '2', '3'];

/// Which command a help menu describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpCommand {
    Proc,
    Container,
    System,
}

const NAVIGATION_KEYBINDINGS: &[&str] = &[
    "Navigation",
    "  k, <Up>             Scroll up",
    "  j, <Down>           Scroll down",
    "  <C-u>               Half page up",
    "  <C-d>               Half page down",
    "  <C-b>               Page up",
    "  <C-f>               Page down",
    "  gg, <Home>          Jump to top",
    "  G, <End>            Jump to bottom",
    "",
];

const PROC_KEYBINDINGS: &[&str] = &[
    "Process actions",
    "  K, <F9>             Open the signal list for the selected process",
    "  <Enter>             Send the highlighted signal",
    "  K, <F9> (in list)   Send SIGTERM",
    "  0-9                 Jump to signal by number (two digits after 1-3)",
    "  p                   Pause / resume refresh",
    "",
    "Sorting",
    "  1-8                 Sort ascending by column",
    "  <F1>-<F8>           Sort descending by column",
    "  0                   Clear sort",
    "",
];

const GENERAL_KEYBINDINGS: &[&str] = &[
    "General",
    "  ?                   Show this help",
    "  <Esc>               Close overlay / cancel",
    "  q, <C-c>            Quit",
];

/// Help lines for a command; section titles have no leading space
pub fn help_keybindings(command: HelpCommand) -> Vec<&'static str> {
    let mut lines = Vec::new();
    match command {
        HelpCommand::Proc => {
            lines.extend_from_slice(NAVIGATION_KEYBINDINGS);
            lines.extend_from_slice(PROC_KEYBINDINGS);
        }
        HelpCommand::Container | HelpCommand::System => {
            lines.extend_from_slice(NAVIGATION_KEYBINDINGS);
        }
    }
    lines.extend_from_slice(GENERAL_KEYBINDINGS);
    lines
}

/// Interactive consumers of the metric bus
///
/// `ProcessController` is the state machine behind `pulsetop proc`;
/// `Dashboard` is the simpler consumer behind `pulsetop container` and
/// `pulsetop system`.
/// Both are driven by `run_consumer`, the one place that multiplexes the
/// refresh timer, bus data and terminal input.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{Stream, StreamExt};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::{
    BusReceiver, MonitorError, MonitorResult, ProcessProbe, Sample, SignalSender, Snapshot,
    SystemMetric,
};
use crate::screens::RenderSink;
use crate::utils::{
    HelpCommand, CONTAINER_HEADER, CPU_HEADER, PROC_HEADER, SIGNALS, SIGTERM, SYSTEM_HEADER,
    TWO_DIGIT_PREFIXES,
};
use crate::widgets::{
    ContainerRow, ErrorBox, HelpMenu, ProcessRow, Scrollable, SignalList, SystemRow, TableModel,
    TableRow,
};

/// Rows taken by borders and the header above the first table row
pub const TABLE_CHROME_ROWS: u16 = 4;
/// Rows taken by the gauges and sparklines of a dashboard
pub const DASHBOARD_CHROME_ROWS: u16 = 10;
/// Samples kept for the CPU sparkline
pub const HISTORY_LEN: usize = 120;
/// Title of the per-core host view
pub const CPU_CORES_TITLE: &str = "CPU cores";

/// A key, independent of the terminal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    F(u8),
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Esc,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Resize(u16, u16),
    Other,
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        match event.code {
            KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Ctrl(c),
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::F(n) => Key::F(n),
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            _ => Key::Other,
        }
    }
}

impl From<Event> for InputEvent {
    fn from(event: Event) -> Self {
        match event {
            // Release events would double every keystroke on Windows
            Event::Key(key) if key.kind != KeyEventKind::Release => InputEvent::Key(key.into()),
            Event::Resize(w, h) => InputEvent::Resize(w, h),
            _ => InputEvent::Other,
        }
    }
}

/// What the event loop does after an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Redraw,
    Idle,
    Quit,
}

/// A bus consumer driven by `run_consumer`
pub trait Consumer {
    fn on_snapshot(&mut self, snapshot: Snapshot) -> Outcome;
    fn handle_key(&mut self, key: Key) -> Outcome;
    fn on_resize(&mut self, width: u16, height: u16) -> Outcome;

    /// Periodic housekeeping between snapshots
    fn on_tick(&mut self) -> Outcome {
        Outcome::Idle
    }
}

/// Run `consumer` until quit, cancellation, or a fatal input error.
///
/// Exactly one event is handled at a time; the consumer is never touched
/// from anywhere else.
pub async fn run_consumer<C, I, S>(
    ctx: CancellationToken,
    mut consumer: C,
    mut bus: BusReceiver<Snapshot>,
    mut input: I,
    sink: &mut S,
    poll_every: Duration,
) -> MonitorResult<()>
where
    C: Consumer,
    I: Stream<Item = io::Result<InputEvent>> + Unpin,
    S: RenderSink<C>,
{
    let mut ticker = interval(poll_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    sink.render(&consumer)?;

    loop {
        let outcome = tokio::select! {
            _ = ctx.cancelled() => return Err(MonitorError::Cancelled),
            _ = ticker.tick() => consumer.on_tick(),
            snapshot = bus.recv() => match snapshot {
                Some(snapshot) => consumer.on_snapshot(snapshot),
                None => return Err(MonitorError::BusClosed),
            },
            event = input.next() => match event {
                Some(Ok(InputEvent::Key(key))) => consumer.handle_key(key),
                Some(Ok(InputEvent::Resize(w, h))) => consumer.on_resize(w, h),
                Some(Ok(InputEvent::Other)) => Outcome::Idle,
                Some(Err(e)) => return Err(MonitorError::Terminal(e)),
                None => {
                    return Err(MonitorError::Terminal(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input stream closed",
                    )))
                }
            },
        };

        match outcome {
            Outcome::Quit => {
                info!("Quit requested");
                return Err(MonitorError::CanceledByUser);
            }
            Outcome::Redraw => sink.render(&consumer)?,
            Outcome::Idle => {}
        }
    }
}

fn list_height(height: u16, chrome: u16) -> usize {
    height.saturating_sub(chrome).max(1) as usize
}

/// Apply a navigation key to any scrollable list. Returns false if `key`
/// is not a navigation key.
fn navigate(list: &mut dyn Scrollable, key: Key, prev: Option<Key>) -> bool {
    match key {
        Key::Up | Key::Char('k') => list.scroll_up(),
        Key::Down | Key::Char('j') => list.scroll_down(),
        Key::Ctrl('u') => list.scroll_half_page_up(),
        Key::Ctrl('d') => list.scroll_half_page_down(),
        Key::Ctrl('b') | Key::PageUp => list.scroll_page_up(),
        Key::Ctrl('f') | Key::PageDown => list.scroll_page_down(),
        Key::Home => list.scroll_top(),
        Key::Char('g') if prev == Some(Key::Char('g')) => list.scroll_top(),
        Key::End | Key::Char('G') => list.scroll_bottom(),
        _ => return false,
    }
    true
}

fn is_quit(key: Key) -> bool {
    matches!(key, Key::Char('q') | Key::Ctrl('c'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    HelpOverlay,
    KillPrompt,
    ErrorOverlay,
}

/// Pending signal delivery, alive while the kill prompt is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillRequest {
    pub target: u32,
    pub signal: i32,
}

pub struct ProcessController {
    mode: Mode,
    table: TableModel<ProcessRow>,
    signals: SignalList,
    help: HelpMenu,
    error: Option<ErrorBox>,
    target: Option<u32>,
    paused: bool,
    prev_key: Option<Key>,
    probe: Box<dyn ProcessProbe>,
    sender: Box<dyn SignalSender>,
}

impl ProcessController {
    pub fn new(probe: Box<dyn ProcessProbe>, sender: Box<dyn SignalSender>) -> Self {
        let mut table = TableModel::new(PROC_HEADER);
        table.enable_cursor();
        Self {
            mode: Mode::Normal,
            table,
            signals: SignalList::new(),
            help: HelpMenu::new(HelpCommand::Proc),
            error: None,
            target: None,
            paused: false,
            prev_key: None,
            probe,
            sender,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn table(&self) -> &TableModel<ProcessRow> {
        &self.table
    }

    pub fn signals(&self) -> &SignalList {
        &self.signals
    }

    pub fn help(&self) -> &HelpMenu {
        &self.help
    }

    pub fn error(&self) -> Option<&ErrorBox> {
        self.error.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn kill_request(&self) -> Option<KillRequest> {
        self.target.map(|target| KillRequest { target, signal: self.signals.selected_signal() })
    }

    fn set_rows(&mut self, samples: Vec<Sample>) {
        self.table.set_rows(samples.into_iter().map(ProcessRow).collect());
    }

    /// Immediate full refresh through the probe, bypassing the bus
    fn refresh(&mut self) {
        match self.probe.refresh() {
            Ok(samples) => self.set_rows(samples),
            Err(e) => self.show_error("Failed to refresh the process list", e.to_string()),
        }
    }

    fn show_error(&mut self, message: &str, detail: String) {
        warn!("{}: {}", message, detail);
        self.error = Some(ErrorBox::new(message, detail));
        self.target = None;
        self.mode = Mode::ErrorOverlay;
    }

    fn back_to_normal(&mut self) {
        self.mode = Mode::Normal;
        self.target = None;
        self.error = None;
    }

    fn open_kill_prompt(&mut self) -> Outcome {
        let Some(pid) = self.table.selected_row().and_then(|row| row.pid()) else {
            return Outcome::Idle;
        };
        debug!("Kill prompt opened for pid {}", pid);
        self.target = Some(pid);
        self.signals.reset();
        self.mode = Mode::KillPrompt;
        Outcome::Redraw
    }

    fn send(&mut self, signal: i32) -> Outcome {
        let Some(pid) = self.target else {
            self.back_to_normal();
            return Outcome::Redraw;
        };
        let name = SIGNALS
            .get((signal - 1) as usize)
            .map(|(_, name, _)| *name)
            .unwrap_or("signal");

        match self.sender.send_signal(pid, signal) {
            Ok(()) => {
                info!("Sent {} to pid {}", name, pid);
                self.back_to_normal();
                self.paused = false;
                self.refresh();
            }
            Err(e) => {
                self.show_error(&format!("Could not send {} to process {}", name, pid), e.to_string())
            }
        }
        Outcome::Redraw
    }

    fn handle_normal(&mut self, key: Key, prev: Option<Key>) -> Outcome {
        if navigate(&mut self.table, key, prev) {
            return Outcome::Redraw;
        }
        match key {
            Key::Char('?') => {
                self.help.scroll_top();
                self.mode = Mode::HelpOverlay;
            }
            Key::Char('K') | Key::F(9) => return self.open_kill_prompt(),
            Key::Char('p') => {
                self.paused = !self.paused;
                info!("Refresh {}", if self.paused { "paused" } else { "resumed" });
            }
            Key::Char('0') => self.table.clear_sort(),
            Key::Char(c @ '1'..='8') => {
                let column = c as usize - '1' as usize;
                self.table.sort_by(column, true);
            }
            Key::F(n @ 1..=8) => self.table.sort_by(n as usize - 1, false),
            _ => return Outcome::Idle,
        }
        Outcome::Redraw
    }

    fn handle_kill_prompt(&mut self, key: Key, prev: Option<Key>) -> Outcome {
        if navigate(&mut self.signals, key, prev) {
            return Outcome::Redraw;
        }
        match key {
            Key::Esc => self.back_to_normal(),
            Key::Enter => return self.send(self.signals.selected_signal()),
            Key::Char('K') | Key::F(9) => return self.send(SIGTERM),
            Key::Char(c) if c.is_ascii_digit() => {
                let digit = c as usize - '0' as usize;
                let number = match prev {
                    Some(Key::Char(p)) if TWO_DIGIT_PREFIXES.contains(&p) => {
                        // A third digit starts a fresh sequence
                        self.prev_key = None;
                        10 * (p as usize - '0' as usize) + digit
                    }
                    _ => digit,
                };
                self.signals.select_by_number(number);
            }
            _ => return Outcome::Idle,
        }
        Outcome::Redraw
    }

    fn handle_help(&mut self, key: Key, prev: Option<Key>) -> Outcome {
        if navigate(&mut self.help, key, prev) {
            return Outcome::Redraw;
        }
        match key {
            Key::Esc | Key::Char('?') => {
                self.mode = Mode::Normal;
                Outcome::Redraw
            }
            _ => Outcome::Idle,
        }
    }

    fn handle_error(&mut self, key: Key) -> Outcome {
        match key {
            Key::Esc | Key::Enter => {
                self.back_to_normal();
                Outcome::Redraw
            }
            _ => Outcome::Idle,
        }
    }
}

impl Consumer for ProcessController {
    fn on_snapshot(&mut self, snapshot: Snapshot) -> Outcome {
        match self.mode {
            Mode::KillPrompt => Outcome::Idle,
            _ if self.paused => Outcome::Idle,
            Mode::HelpOverlay => {
                self.set_rows(snapshot.per_subject);
                Outcome::Idle
            }
            Mode::Normal | Mode::ErrorOverlay => {
                self.set_rows(snapshot.per_subject);
                Outcome::Redraw
            }
        }
    }

    fn handle_key(&mut self, key: Key) -> Outcome {
        if is_quit(key) {
            return Outcome::Quit;
        }
        let prev = self.prev_key.replace(key);
        match self.mode {
            Mode::Normal => self.handle_normal(key, prev),
            Mode::KillPrompt => self.handle_kill_prompt(key, prev),
            Mode::HelpOverlay => self.handle_help(key, prev),
            Mode::ErrorOverlay => self.handle_error(key),
        }
    }

    fn on_resize(&mut self, _width: u16, height: u16) -> Outcome {
        let rows = list_height(height, TABLE_CHROME_ROWS);
        self.table.set_visible_height(rows);
        self.signals.set_visible_height(rows);
        // Help popup takes 80% of the screen
        self.help.set_visible_height(list_height(height - height / 5, 2));
        Outcome::Redraw
    }

    /// Existence poll for the kill target
    fn on_tick(&mut self) -> Outcome {
        let Some(pid) = self.target else {
            return Outcome::Idle;
        };
        if self.mode != Mode::KillPrompt || self.probe.exists(pid) {
            return Outcome::Idle;
        }
        info!("Process {} is gone, closing the kill prompt", pid);
        self.back_to_normal();
        self.paused = false;
        self.refresh();
        Outcome::Redraw
    }
}

/// Consumer state shared by the container and host dashboards: totals
/// history for the gauges and sparklines, plus a navigable table of the
/// samples `keep` accepts.
pub struct Dashboard<R> {
    title: &'static str,
    snapshot: Snapshot,
    table: TableModel<R>,
    keep: fn(&Sample) -> bool,
    cpu_history: VecDeque<u64>,
    mem_history: VecDeque<u64>,
    help: HelpMenu,
    show_help: bool,
    prev_key: Option<Key>,
}

pub type ContainerDashboard = Dashboard<ContainerRow>;
pub type SystemDashboard = Dashboard<SystemRow>;

impl Default for ContainerDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerDashboard {
    pub fn new() -> Self {
        Dashboard::build("Containers", &CONTAINER_HEADER, HelpCommand::Container, |_| true)
    }
}

impl SystemDashboard {
    /// Host dashboard; `cpu_only` lists cores instead of memory, network
    /// interfaces and disks
    pub fn new(cpu_only: bool) -> Self {
        if cpu_only {
            Dashboard::build(CPU_CORES_TITLE, &CPU_HEADER, HelpCommand::System, |s| {
                matches!(SystemMetric::parse(&s.id), Some(SystemMetric::Core(_)))
            })
        } else {
            Dashboard::build("System", &SYSTEM_HEADER, HelpCommand::System, |s| {
                !matches!(SystemMetric::parse(&s.id), Some(SystemMetric::Core(_)) | None)
            })
        }
    }

    pub fn cpu_only(&self) -> bool {
        self.title == CPU_CORES_TITLE
    }
}

impl<R: TableRow + Clone + From<Sample>> Dashboard<R> {
    fn build(
        title: &'static str,
        header: &[&str],
        command: HelpCommand,
        keep: fn(&Sample) -> bool,
    ) -> Self {
        let mut table = TableModel::new(header.iter().copied());
        table.enable_cursor();
        Self {
            title,
            snapshot: Snapshot::default(),
            table,
            keep,
            cpu_history: VecDeque::with_capacity(HISTORY_LEN),
            mem_history: VecDeque::with_capacity(HISTORY_LEN),
            help: HelpMenu::new(command),
            show_help: false,
            prev_key: None,
        }
    }
}

impl<R> Dashboard<R> {
    pub fn title(&self) -> &str {
        self.title
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn table(&self) -> &TableModel<R> {
        &self.table
    }

    pub fn cpu_history(&self) -> Vec<u64> {
        self.cpu_history.iter().copied().collect()
    }

    pub fn mem_history(&self) -> Vec<u64> {
        self.mem_history.iter().copied().collect()
    }

    pub fn help(&self) -> Option<&HelpMenu> {
        self.show_help.then_some(&self.help)
    }

    fn push(history: &mut VecDeque<u64>, value: f64) {
        if history.len() == HISTORY_LEN {
            history.pop_front();
        }
        history.push_back(value.clamp(0.0, 100.0).round() as u64);
    }
}

impl<R: TableRow + Clone + From<Sample>> Consumer for Dashboard<R> {
    fn on_snapshot(&mut self, snapshot: Snapshot) -> Outcome {
        Self::push(&mut self.cpu_history, snapshot.total_cpu_percent);
        Self::push(&mut self.mem_history, snapshot.total_mem_percent);
        let keep = self.keep;
        self.table.set_rows(
            snapshot.per_subject.iter().filter(|s| keep(s)).cloned().map(R::from).collect(),
        );
        self.snapshot = snapshot;
        Outcome::Redraw
    }

    fn handle_key(&mut self, key: Key) -> Outcome {
        if is_quit(key) {
            return Outcome::Quit;
        }
        let prev = self.prev_key.replace(key);
        let list: &mut dyn Scrollable = if self.show_help { &mut self.help } else { &mut self.table };
        if navigate(list, key, prev) {
            return Outcome::Redraw;
        }
        match key {
            Key::Char('?') => {
                self.help.scroll_top();
                self.show_help = !self.show_help;
                Outcome::Redraw
            }
            Key::Esc if self.show_help => {
                self.show_help = false;
                Outcome::Redraw
            }
            _ => Outcome::Idle,
        }
    }

    fn on_resize(&mut self, _width: u16, height: u16) -> Outcome {
        self.table.set_visible_height(list_height(height, DASHBOARD_CHROME_ROWS + TABLE_CHROME_ROWS));
        self.help.set_visible_height(list_height(height - height / 5, 2));
        Outcome::Redraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::process::{MockProcessProbe, MockSignalSender};
    use crate::core::{metric_bus, SignalError, SourceError, Subject};
    use std::sync::{Arc, Mutex};

    fn sample(pid: u32, name: &str, cpu: f64) -> Sample {
        let mut s = Sample::zeroed(&Subject::new(pid.to_string(), name));
        s.cpu_percent = cpu;
        s
    }

    fn snapshot(samples: Vec<Sample>) -> Snapshot {
        Snapshot { per_subject: samples, ..Snapshot::default() }
    }

    fn controller(probe: MockProcessProbe, sender: MockSignalSender) -> ProcessController {
        let mut c = ProcessController::new(Box::new(probe), Box::new(sender));
        c.on_resize(120, 40);
        c.on_snapshot(snapshot(vec![sample(10, "init", 1.0), sample(20, "sshd", 3.0), sample(30, "bash", 2.0)]));
        c
    }

    fn idle_controller() -> ProcessController {
        controller(MockProcessProbe::new(), MockSignalSender::new())
    }

    fn press(c: &mut ProcessController, keys: &[Key]) {
        for key in keys {
            c.handle_key(*key);
        }
    }

    fn pids(c: &ProcessController) -> Vec<String> {
        c.table().rows().iter().map(|r| r.0.id.clone()).collect()
    }

    #[test]
    fn test_two_digit_signal_selection() {
        let mut c = idle_controller();
        press(&mut c, &[Key::Char('K')]);
        assert_eq!(c.mode(), Mode::KillPrompt);

        press(&mut c, &[Key::Char('2'), Key::Char('5')]);
        assert_eq!(c.signals().selected_signal(), 25);

        // Memory was cleared: "3" stands alone
        press(&mut c, &[Key::Char('3')]);
        assert_eq!(c.signals().selected_signal(), 3);
    }

    #[test]
    fn test_single_digit_signal_selection() {
        let mut c = idle_controller();
        press(&mut c, &[Key::F(9), Key::Char('9')]);
        assert_eq!(c.signals().selected_signal(), 9);

        press(&mut c, &[Key::Char('5')]);
        assert_eq!(c.signals().selected_signal(), 5);
        press(&mut c, &[Key::Char('5')]);
        assert_eq!(c.signals().selected_signal(), 5);
    }

    #[test]
    fn test_kill_prompt_captures_target_and_pauses_refresh() {
        let mut c = idle_controller();
        press(&mut c, &[Key::Char('j'), Key::Char('K')]);
        assert_eq!(c.kill_request(), Some(KillRequest { target: 20, signal: 1 }));

        let outcome = c.on_snapshot(snapshot(vec![sample(99, "new", 0.0)]));
        assert_eq!(outcome, Outcome::Idle);
        assert_eq!(pids(&c), vec!["10", "20", "30"]);

        press(&mut c, &[Key::Esc]);
        assert_eq!(c.mode(), Mode::Normal);
        assert_eq!(c.kill_request(), None);
    }

    #[test]
    fn test_confirm_sends_selected_signal() {
        let mut probe = MockProcessProbe::new();
        probe.expect_refresh().times(1).returning(|| Ok(vec![sample(10, "init", 1.0)]));
        let mut sender = MockSignalSender::new();
        sender
            .expect_send_signal()
            .withf(|pid, signal| *pid == 10 && *signal == 9)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut c = controller(probe, sender);
        press(&mut c, &[Key::Char('K'), Key::Char('9'), Key::Enter]);
        assert_eq!(c.mode(), Mode::Normal);
        assert_eq!(pids(&c), vec!["10"]);
    }

    #[test]
    fn test_kill_shortcut_sends_sigterm() {
        let mut probe = MockProcessProbe::new();
        probe.expect_refresh().returning(|| Ok(Vec::new()));
        let mut sender = MockSignalSender::new();
        sender
            .expect_send_signal()
            .withf(|_, signal| *signal == SIGTERM)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut c = controller(probe, sender);
        press(&mut c, &[Key::Char('K'), Key::Char('K')]);
        assert_eq!(c.mode(), Mode::Normal);
    }

    #[test]
    fn test_failed_send_shows_error_overlay() {
        let mut sender = MockSignalSender::new();
        sender.expect_send_signal().returning(|pid, _| Err(SignalError::NotFound(pid)));

        let mut c = controller(MockProcessProbe::new(), sender);
        press(&mut c, &[Key::Char('K'), Key::Enter]);
        assert_eq!(c.mode(), Mode::ErrorOverlay);
        let error = c.error().unwrap();
        assert!(error.message.contains("SIGHUP"));
        assert!(error.detail.contains("10"));

        press(&mut c, &[Key::Esc]);
        assert_eq!(c.mode(), Mode::Normal);
        assert!(c.error().is_none());
    }

    #[test]
    fn test_vanished_target_returns_to_normal_with_one_refresh() {
        let mut probe = MockProcessProbe::new();
        probe.expect_exists().withf(|pid| *pid == 10).times(1).returning(|_| false);
        probe
            .expect_refresh()
            .times(1)
            .returning(|| Ok(vec![sample(20, "sshd", 3.0), sample(30, "bash", 2.0)]));

        let mut c = controller(probe, MockSignalSender::new());
        press(&mut c, &[Key::Char('K')]);
        assert_eq!(c.on_tick(), Outcome::Redraw);
        assert_eq!(c.mode(), Mode::Normal);
        assert_eq!(pids(&c), vec!["20", "30"]);

        // Back in Normal the poll is off
        assert_eq!(c.on_tick(), Outcome::Idle);
    }

    #[test]
    fn test_kill_resumes_paused_refresh() {
        let mut probe = MockProcessProbe::new();
        probe.expect_exists().returning(|_| false);
        probe.expect_refresh().returning(|| Ok(vec![sample(20, "sshd", 3.0)]));
        let mut sender = MockSignalSender::new();
        sender.expect_send_signal().times(1).returning(|_, _| Ok(()));

        let mut c = controller(probe, sender);
        press(&mut c, &[Key::Char('p'), Key::Char('K'), Key::Enter]);
        assert!(!c.is_paused());
        assert_eq!(c.on_snapshot(snapshot(vec![sample(40, "a", 0.0)])), Outcome::Redraw);

        // Same for a target that exits while the prompt is open
        press(&mut c, &[Key::Char('p'), Key::Char('K')]);
        assert!(c.is_paused());
        c.on_tick();
        assert!(!c.is_paused());
    }

    #[test]
    fn test_live_target_keeps_prompt_open() {
        let mut probe = MockProcessProbe::new();
        probe.expect_exists().returning(|_| true);
        probe.expect_refresh().never();

        let mut c = controller(probe, MockSignalSender::new());
        press(&mut c, &[Key::Char('K')]);
        assert_eq!(c.on_tick(), Outcome::Idle);
        assert_eq!(c.on_tick(), Outcome::Idle);
        assert_eq!(c.mode(), Mode::KillPrompt);
    }

    #[test]
    fn test_failed_refresh_shows_error() {
        let mut probe = MockProcessProbe::new();
        probe.expect_exists().returning(|_| false);
        probe
            .expect_refresh()
            .times(1)
            .returning(|| Err(SourceError::Unavailable("proc table".into())));

        let mut c = controller(probe, MockSignalSender::new());
        press(&mut c, &[Key::Char('K')]);
        c.on_tick();
        assert_eq!(c.mode(), Mode::ErrorOverlay);
    }

    #[test]
    fn test_sorting_keys() {
        let mut c = idle_controller();
        press(&mut c, &[Key::Char('3')]);
        assert_eq!(pids(&c), vec!["10", "30", "20"]);
        press(&mut c, &[Key::Char('3')]);
        assert_eq!(pids(&c), vec!["10", "30", "20"]);

        press(&mut c, &[Key::F(3)]);
        assert_eq!(pids(&c), vec!["20", "30", "10"]);
        assert!(c.table().header()[2].ends_with(crate::utils::DOWN_ARROW));

        // Re-applied to fresh data
        c.on_snapshot(snapshot(vec![sample(40, "a", 0.5), sample(50, "b", 9.0)]));
        assert_eq!(pids(&c), vec!["50", "40"]);

        press(&mut c, &[Key::Char('0')]);
        assert_eq!(pids(&c), vec!["40", "50"]);
        assert_eq!(c.table().sort_column_index(), -1);
    }

    #[test]
    fn test_cursor_follows_process() {
        let mut c = idle_controller();
        press(&mut c, &[Key::Char('j')]);
        assert_eq!(c.table().selected_row().unwrap().0.id, "20");

        c.on_snapshot(snapshot(vec![sample(5, "new", 0.0), sample(30, "bash", 2.0), sample(20, "sshd", 3.0)]));
        assert_eq!(c.table().selected(), 2);
        assert_eq!(c.table().selected_row().unwrap().0.id, "20");
    }

    #[test]
    fn test_navigation_gestures() {
        let mut c = idle_controller();
        press(&mut c, &[Key::Char('G')]);
        assert_eq!(c.table().selected(), 2);
        press(&mut c, &[Key::Char('g'), Key::Char('g')]);
        assert_eq!(c.table().selected(), 0);
        press(&mut c, &[Key::End, Key::Ctrl('u')]);
        assert_eq!(c.table().selected(), 0);
        press(&mut c, &[Key::Ctrl('d')]);
        assert_eq!(c.table().selected(), 2);
    }

    #[test]
    fn test_help_overlay_updates_rows_without_drawing() {
        let mut c = idle_controller();
        press(&mut c, &[Key::Char('?')]);
        assert_eq!(c.mode(), Mode::HelpOverlay);

        let outcome = c.on_snapshot(snapshot(vec![sample(77, "late", 0.0)]));
        assert_eq!(outcome, Outcome::Idle);

        press(&mut c, &[Key::Esc]);
        assert_eq!(c.mode(), Mode::Normal);
        assert_eq!(pids(&c), vec!["77"]);
    }

    #[test]
    fn test_pause_holds_rows() {
        let mut c = idle_controller();
        press(&mut c, &[Key::Char('p')]);
        assert!(c.is_paused());
        assert_eq!(c.on_snapshot(snapshot(Vec::new())), Outcome::Idle);
        assert_eq!(pids(&c).len(), 3);

        press(&mut c, &[Key::Char('p')]);
        c.on_snapshot(snapshot(Vec::new()));
        assert!(pids(&c).is_empty());
    }

    #[test]
    fn test_kill_prompt_needs_a_selected_row() {
        let mut c = ProcessController::new(Box::new(MockProcessProbe::new()), Box::new(MockSignalSender::new()));
        assert_eq!(c.handle_key(Key::Char('K')), Outcome::Idle);
        assert_eq!(c.mode(), Mode::Normal);
    }

    #[test]
    fn test_quit_from_any_mode() {
        let mut c = idle_controller();
        assert_eq!(c.handle_key(Key::Char('q')), Outcome::Quit);
        press(&mut c, &[Key::Char('K')]);
        assert_eq!(c.handle_key(Key::Ctrl('c')), Outcome::Quit);
    }

    #[test]
    fn test_key_from_crossterm() {
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(Key::from(ctrl_d), Key::Ctrl('d'));
        let f9 = KeyEvent::new(KeyCode::F(9), KeyModifiers::NONE);
        assert_eq!(Key::from(f9), Key::F(9));
        assert_eq!(InputEvent::from(Event::Resize(80, 24)), InputEvent::Resize(80, 24));
    }

    #[test]
    fn test_container_dashboard_navigation() {
        let mut d = ContainerDashboard::new();
        d.on_resize(120, 20);
        d.on_snapshot(snapshot((1..=30).map(|i| sample(i, "web", 0.0)).collect()));
        assert_eq!(d.table().location(), (1, 6, 30));
        assert!(d.table().cursor_enabled());

        let steps = [
            (Key::Down, 1),
            (Key::Char('j'), 2),
            (Key::PageDown, 8),
            (Key::Ctrl('d'), 11),
            (Key::End, 29),
            (Key::Char('g'), 29),
            (Key::Char('g'), 0),
            (Key::Char('G'), 29),
        ];
        for (key, selected) in steps {
            let outcome = d.handle_key(key);
            assert_eq!(d.table().selected(), selected, "after {:?}", key);
            if key != Key::Char('g') || selected == 0 {
                assert_eq!(outcome, Outcome::Redraw, "after {:?}", key);
            }
        }
        assert_eq!(d.table().location(), (25, 30, 30));

        // With help open the keys scroll the help text instead
        d.handle_key(Key::Char('?'));
        d.handle_key(Key::Char('k'));
        assert_eq!(d.table().selected(), 29);
        assert_eq!(d.help().map(|h| h.selected()), Some(0));
    }

    #[test]
    fn test_system_dashboard_filters_rows() {
        use crate::core::SystemMetric;

        let host = |metric: SystemMetric| Sample::zeroed(&Subject::new(metric.id(), metric.id()));
        let samples = vec![
            host(SystemMetric::Core(0)),
            host(SystemMetric::Core(1)),
            host(SystemMetric::Memory),
            host(SystemMetric::Network("eth0".into())),
            host(SystemMetric::Disk("/".into())),
        ];
        let ids = |d: &SystemDashboard| -> Vec<String> {
            d.table().rows().iter().map(|r| r.0.id.clone()).collect()
        };

        let mut general = SystemDashboard::new(false);
        general.on_snapshot(snapshot(samples.clone()));
        assert_eq!(ids(&general), vec!["memory", "net:eth0", "disk:/"]);
        assert_eq!(general.snapshot().len(), 5);
        assert_eq!(general.table().header()[0], "Device");

        let mut cores = SystemDashboard::new(true);
        cores.on_snapshot(snapshot(samples));
        assert_eq!(ids(&cores), vec!["cpu0", "cpu1"]);
        assert!(cores.cpu_only());
        assert!(!general.cpu_only());
    }

    #[test]
    fn test_container_dashboard_history() {
        let mut d = ContainerDashboard::new();
        for i in 0..(HISTORY_LEN + 5) {
            let mut s = snapshot(vec![sample(1, "web", 0.0)]);
            s.total_cpu_percent = (i % 100) as f64;
            d.on_snapshot(s);
        }
        assert_eq!(d.cpu_history().len(), HISTORY_LEN);
        assert_eq!(d.table().rows().len(), 1);

        assert_eq!(d.handle_key(Key::Char('?')), Outcome::Redraw);
        assert!(d.help().is_some());
        d.handle_key(Key::Esc);
        assert!(d.help().is_none());
        assert_eq!(d.handle_key(Key::Char('q')), Outcome::Quit);
    }

    /// Counts frames instead of drawing them
    #[derive(Default, Clone)]
    struct CountingSink(Arc<Mutex<usize>>);

    impl<C> RenderSink<C> for CountingSink {
        fn render(&mut self, _model: &C) -> io::Result<()> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_consumer_quits_on_key() {
        let ctx = CancellationToken::new();
        let (tx, rx) = metric_bus();
        tx.publish(&ctx, snapshot(vec![sample(1, "init", 0.0)])).await.unwrap();

        let input = futures::stream::iter(vec![
            Ok(InputEvent::Resize(100, 30)),
            Ok(InputEvent::Key(Key::Char('q'))),
        ])
        .chain(futures::stream::pending());

        let mut sink = CountingSink::default();
        let result = run_consumer(
            ctx.clone(),
            ContainerDashboard::new(),
            rx,
            Box::pin(input),
            &mut sink,
            Duration::from_secs(60),
        )
        .await;

        assert!(matches!(result, Err(MonitorError::CanceledByUser)));
        assert!(*sink.0.lock().unwrap() >= 2);
    }

    #[tokio::test]
    async fn test_run_consumer_stops_on_cancel() {
        let ctx = CancellationToken::new();
        let (_tx, rx) = metric_bus::<Snapshot>();
        ctx.cancel();

        let mut sink = CountingSink::default();
        let result = run_consumer(
            ctx,
            ContainerDashboard::new(),
            rx,
            Box::pin(futures::stream::pending()),
            &mut sink,
            Duration::from_secs(60),
        )
        .await;

        assert!(matches!(result, Err(MonitorError::Cancelled)));
    }
}

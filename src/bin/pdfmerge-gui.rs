//! pdfmerge-gui - Desktop window for building a list of PDFs and merging it.

use anyhow::Context;
use fltk::{
    app,
    browser::MultiBrowser,
    button::Button,
    dialog,
    enums::{Align, Color, Event, FrameType},
    frame::Frame,
    misc::Progress,
    prelude::*,
    window::Window,
};
use std::path::{Path, PathBuf};

use pdfmerge::merge::{JobEvent, JobStatus};
use pdfmerge::utils::{open_in_default_app, parse_dropped_paths, partition_dropped};
use pdfmerge::{Error, Session};

const WIDTH: i32 = 640;
const HEIGHT: i32 = 480;
const COLUMN_WIDTHS: &[i32] = &[60, 400, 110];

#[derive(Debug, Clone)]
enum Message {
    Add,
    Remove,
    Clear,
    MoveUp,
    MoveDown,
    Merge,
    SelectionChanged,
    Dropped(String),
    Job(JobEvent),
    Quit,
}

struct Gui {
    browser: MultiBrowser,
    status: Frame,
    progress: Progress,
    add: Button,
    remove: Button,
    clear: Button,
    move_up: Button,
    move_down: Button,
    merge: Button,
}

impl Gui {
    fn build(sender: app::Sender<Message>) -> (Window, Self) {
        let mut window = Window::default()
            .with_size(WIDTH, HEIGHT)
            .with_label("PDF Merger");

        let mut add = Button::new(10, 10, 120, 30, "Add PDF Files");
        let mut remove = Button::new(140, 10, 130, 30, "Remove Selected");
        let mut clear = Button::new(280, 10, 90, 30, "Clear All");
        let mut move_up = Button::new(380, 10, 80, 30, "Move Up");
        let mut move_down = Button::new(470, 10, 90, 30, "Move Down");

        let mut x = 12;
        for (title, width) in ["Order", "File Name", "Size"].iter().zip(COLUMN_WIDTHS) {
            let mut header = Frame::new(x, 48, *width, 20, None);
            header.set_label(title);
            header.set_align(Align::Left | Align::Inside);
            x += width;
        }

        let mut browser = MultiBrowser::new(10, 70, WIDTH - 20, 280, None);
        browser.set_column_char('\t');
        browser.set_column_widths(COLUMN_WIDTHS);
        browser.emit(sender, Message::SelectionChanged);
        browser.handle(move |_, event| handle_drop(event, sender));

        let mut progress = Progress::new(10, 360, WIDTH - 20, 20, None);
        progress.set_minimum(0.0);
        progress.set_maximum(1.0);
        progress.set_selection_color(Color::from_rgb(0x3b, 0x82, 0xf6));

        let mut status = Frame::new(10, 385, WIDTH - 20, 25, None);
        status.set_frame(FrameType::FlatBox);
        status.set_align(Align::Left | Align::Inside);

        let mut merge = Button::new(WIDTH - 150, HEIGHT - 55, 140, 40, "Merge PDFs");

        add.emit(sender, Message::Add);
        remove.emit(sender, Message::Remove);
        clear.emit(sender, Message::Clear);
        move_up.emit(sender, Message::MoveUp);
        move_down.emit(sender, Message::MoveDown);
        merge.emit(sender, Message::Merge);

        window.set_callback(move |_| {
            // Escape also triggers the window callback; only closing quits
            if app::event() == Event::Close {
                sender.send(Message::Quit);
            }
        });
        window.end();

        let gui = Self {
            browser,
            status,
            progress,
            add,
            remove,
            clear,
            move_up,
            move_down,
            merge,
        };
        (window, gui)
    }

    /// Indices of the selected rows (0-based).
    fn selection(&self) -> Vec<usize> {
        (1..=self.browser.size())
            .filter(|&line| self.browser.selected(line))
            .map(|line| (line - 1) as usize)
            .collect()
    }

    /// Redraw the table from the session and reselect `selection`.
    fn refresh(&mut self, session: &Session, selection: &[usize]) {
        self.browser.clear();
        for (i, record) in session.files().iter().enumerate() {
            self.browser.add(&format!(
                "{}\t{}\t{}",
                i + 1,
                record.display_name(),
                record.formatted_size()
            ));
        }
        for &index in selection {
            self.browser.select(index as i32 + 1);
        }
        self.update_controls(session);
    }

    fn update_controls(&mut self, session: &Session) {
        let selection = self.selection();
        let idle = !session.is_merging();

        set_active(&mut self.add, idle);
        set_active(&mut self.clear, idle && !session.files().is_empty());
        set_active(&mut self.remove, session.can_remove(&selection));
        set_active(&mut self.move_up, session.can_move_up(&selection));
        set_active(&mut self.move_down, session.can_move_down(&selection));
        set_active(&mut self.merge, session.can_merge());

        self.status.set_label(session.status());
    }
}

fn set_active(button: &mut Button, active: bool) {
    if active {
        button.activate();
    } else {
        button.deactivate();
    }
}

/// Drag-and-drop arrives as DndEnter, DndDrag, DndRelease and then a Paste
/// carrying the dropped paths.
fn handle_drop(event: Event, sender: app::Sender<Message>) -> bool {
    match event {
        Event::DndEnter | Event::DndDrag | Event::DndRelease | Event::DndLeave => true,
        Event::Paste => {
            sender.send(Message::Dropped(app::event_text()));
            true
        }
        _ => false,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the merge runtime")?;
    let mut session = Session::new(runtime.handle().clone());

    let app = app::App::default().with_scheme(app::Scheme::Gtk);
    let (sender, receiver) = app::channel::<Message>();

    let (mut window, mut gui) = Gui::build(sender);
    gui.refresh(&session, &[]);
    window.show();

    while app.wait() {
        if let Some(message) = receiver.recv() {
            if let Err(err) = handle_message(message, &mut session, &mut gui, sender) {
                log::warn!("{err}");
                dialog::alert_default(&err.to_string());
                gui.update_controls(&session);
            }
        }
    }

    Ok(())
}

fn handle_message(
    message: Message,
    session: &mut Session,
    gui: &mut Gui,
    sender: app::Sender<Message>,
) -> Result<(), Error> {
    match message {
        Message::Add => {
            let files = choose_input_files();
            if !files.is_empty() {
                session.add_files(files)?;
                gui.refresh(session, &[]);
            }
        }
        Message::Dropped(text) => {
            let (pdfs, skipped) = partition_dropped(parse_dropped_paths(&text));
            if !pdfs.is_empty() {
                session.add_files(pdfs)?;
                gui.refresh(session, &[]);
            }
            if !skipped.is_empty() {
                dialog::alert_default(&format!(
                    "Skipped {} item(s) that are not PDF files.",
                    skipped.len()
                ));
            }
        }
        Message::Remove => {
            let selection = gui.selection();
            session.remove(&selection)?;
            gui.refresh(session, &[]);
        }
        Message::Clear => {
            if session.files().is_empty() {
                return Ok(());
            }
            let answer = dialog::choice2_default(
                "Are you sure you want to clear all files?",
                "No",
                "Yes",
                "",
            );
            if answer == Some(1) {
                session.clear()?;
                gui.refresh(session, &[]);
            }
        }
        Message::MoveUp => {
            let selection = session.move_up(&gui.selection())?;
            gui.refresh(session, &selection);
        }
        Message::MoveDown => {
            let selection = session.move_down(&gui.selection())?;
            gui.refresh(session, &selection);
        }
        Message::SelectionChanged => gui.update_controls(session),
        Message::Merge => {
            let Some(output) = choose_output_file() else {
                return Ok(());
            };

            gui.progress.set_maximum(session.files().len() as f64);
            gui.progress.set_value(0.0);

            // The job handle is not awaited; completion arrives as an event
            let _job = session.start_merge(output, move |event| {
                sender.send(Message::Job(event));
                app::awake();
            })?;
            gui.update_controls(session);
        }
        Message::Job(event) => {
            session.handle_event(&event);
            match &event {
                JobEvent::Progress(progress) => gui.progress.set_value(progress.index as f64),
                JobEvent::Finished(job) => {
                    gui.update_controls(session);
                    report_outcome(job.status());
                }
                JobEvent::Started { .. } | JobEvent::Writing => {}
            }
            gui.status.set_label(session.status());
        }
        Message::Quit => {
            if session.is_merging() {
                dialog::alert_default("A merge is still running. Please wait for it to finish.");
            } else {
                app::quit();
            }
        }
    }

    Ok(())
}

fn report_outcome(status: &JobStatus) {
    match status {
        JobStatus::Succeeded(report) => {
            let question = format!(
                "Successfully merged {} files ({} pages, {}).\n\n\
                 Saved to: {}\n\nOpen the merged file?",
                report.files_merged,
                report.total_pages,
                report.format_output_size(),
                report.output_path.display()
            );
            if dialog::choice2_default(&question, "No", "Yes", "") == Some(1) {
                open_output(&report.output_path);
            }
        }
        JobStatus::Failed(failure) => {
            dialog::alert_default(&format!("Failed to merge PDFs:\n\n{failure}"));
        }
        JobStatus::Pending | JobStatus::Running => {}
    }
}

fn open_output(path: &Path) {
    if let Err(err) = open_in_default_app(path) {
        log::warn!("Could not open {}: {}", path.display(), err);
        dialog::alert_default(&format!("Could not open the file:\n{err}"));
    }
}

fn choose_input_files() -> Vec<PathBuf> {
    let mut chooser =
        dialog::NativeFileChooser::new(dialog::NativeFileChooserType::BrowseMultiFile);
    chooser.set_title("Select PDF files");
    chooser.set_filter("PDF files\t*.pdf");
    chooser.show();
    chooser
        .filenames()
        .into_iter()
        .filter(|path| !path.as_os_str().is_empty())
        .collect()
}

/// Ask where to save the merged PDF. `None` when the dialog is cancelled.
fn choose_output_file() -> Option<PathBuf> {
    let mut chooser = dialog::NativeFileChooser::new(dialog::NativeFileChooserType::BrowseSaveFile);
    chooser.set_title("Save merged PDF as");
    chooser.set_filter("PDF files\t*.pdf");
    chooser.set_option(dialog::NativeFileChooserOptions::SaveAsConfirm);
    chooser.set_preset_file("merged.pdf");
    chooser.show();

    let mut output = chooser.filename();
    if output.as_os_str().is_empty() {
        return None;
    }
    if output.extension().is_none() {
        output.set_extension("pdf");
    }
    Some(output)
}

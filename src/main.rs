use iced::widget::{column, container, image, pick_list, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};

// Declare the application modules
mod config;
mod store;

use config::Secrets;
use store::fetch::FetchedImage;
use store::Store;

/// Bucket holding the true-color snapshots
const BUCKET_NAME: &str = "penage-true-color-images";
/// Key prefix the snapshots live under (empty = bucket root)
const PREFIX: &str = "";

/// Main application state
struct Viewer {
    /// Bucket handle; None until the startup connection finished or if
    /// credentials were missing
    store: Option<Store>,
    /// Snapshot dates available in the bucket, newest first
    dates: Vec<String>,
    /// The date whose snapshot is (or is being) displayed
    selected: Option<String>,
    /// The decoded snapshot for the selected date
    snapshot: Option<FetchedImage>,
    /// True while a download is in flight
    loading: bool,
    /// Warning or error text shown in place of the missing content
    notice: Option<Notice>,
}

/// User-facing message severity
#[derive(Debug, Clone)]
enum Notice {
    Warning(String),
    Error(String),
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Startup listing finished: the store handle plus the available dates
    Connected(Result<(Store, Vec<String>), String>),
    /// User picked a date in the dropdown
    DateSelected(String),
    /// Snapshot download finished
    SnapshotFetched(Result<FetchedImage, String>),
}

impl Viewer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let viewer = Viewer {
            store: None,
            dates: Vec::new(),
            selected: None,
            snapshot: None,
            loading: false,
            notice: None,
        };

        match Secrets::load() {
            Ok(secrets) => {
                println!("🛰️  Connecting to bucket {}", BUCKET_NAME);
                (
                    viewer,
                    Task::perform(connect_and_list(secrets), Message::Connected),
                )
            }
            Err(e) => {
                // The page still comes up; it just has nothing to show
                eprintln!("❌ {}", e);
                (
                    Viewer {
                        notice: Some(Notice::Error(e.to_string())),
                        ..viewer
                    },
                    Task::none(),
                )
            }
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Connected(Ok((store, dates))) => {
                println!("🗓️  Found {} dated snapshots", dates.len());
                self.store = Some(store);
                self.dates = dates;

                if self.dates.is_empty() {
                    self.notice = Some(Notice::Warning(
                        "No images found in the bucket.".to_string(),
                    ));
                    return Task::none();
                }

                // Default to the most recent date and bring its image up
                let newest = self.dates[0].clone();
                self.select(newest)
            }
            Message::Connected(Err(message)) => {
                eprintln!("❌ {}", message);
                self.notice = Some(Notice::Error(message));
                Task::none()
            }
            Message::DateSelected(date) => {
                // Re-picking the current date is a no-op, no refetch
                if self.selected.as_deref() == Some(date.as_str()) {
                    return Task::none();
                }
                self.select(date)
            }
            Message::SnapshotFetched(Ok(snapshot)) => {
                println!("🖼️  Decoded {}x{} snapshot", snapshot.width, snapshot.height);
                self.snapshot = Some(snapshot);
                self.loading = false;
                Task::none()
            }
            Message::SnapshotFetched(Err(message)) => {
                eprintln!("❌ {}", message);
                self.snapshot = None;
                self.loading = false;
                self.notice = Some(Notice::Error(message));
                Task::none()
            }
        }
    }

    /// Store a new selection and start downloading its snapshot.
    fn select(&mut self, date: String) -> Task<Message> {
        let Some(store) = self.store.clone() else {
            return Task::none();
        };

        self.selected = Some(date.clone());
        self.snapshot = None;
        self.notice = None;
        self.loading = true;

        Task::perform(
            async move { store.fetch_image(&date).await.map_err(|e| e.to_string()) },
            Message::SnapshotFetched,
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content: Column<Message> = column![
            text("Lake Panache Satellite Images").size(32),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        if !self.dates.is_empty() {
            content = content.push(
                pick_list(
                    self.dates.clone(),
                    self.selected.clone(),
                    Message::DateSelected,
                )
                .placeholder("Select a date"),
            );
        }

        if let Some(notice) = &self.notice {
            content = content.push(match notice {
                Notice::Warning(message) => text(message.clone()).size(16),
                Notice::Error(message) => text(message.clone()).size(16).style(text::danger),
            });
        } else if self.loading {
            content = content.push(text("Downloading snapshot...").size(16));
        } else if let (Some(snapshot), Some(date)) = (&self.snapshot, &self.selected) {
            content = content.push(image(snapshot.handle.clone()).width(Length::Fill));
            content = content.push(text(format!("Image for {}", date)).size(16));
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application(
        "Lake Panache Satellite Images",
        Viewer::update,
        Viewer::view,
    )
    .theme(Viewer::theme)
    .centered()
    .run_with(Viewer::new)
}

/// Connect to the bucket and run the startup listing.
async fn connect_and_list(secrets: Secrets) -> Result<(Store, Vec<String>), String> {
    let store = Store::connect(&secrets, BUCKET_NAME, PREFIX).await;
    let dates = store.list_dates().await.map_err(|e| e.to_string())?;
    Ok((store, dates))
}

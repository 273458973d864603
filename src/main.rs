use iced::widget::{column, container, scrollable, text_editor};
use iced::{Element, Length, Size, Task, Theme};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ui;

use item_catalog::config::Config;
use item_catalog::state::carousel::Carousel;
use item_catalog::state::data::{ItemId, ItemType};
use item_catalog::state::library::Library;
use item_catalog::state::storage::{MemoryStorage, SqliteStorage, Storage};
use ui::form::ItemForm;
use ui::image::ImageCache;
use ui::{Notice, Page};

/// How long the "added" confirmation stays on screen
const NOTICE_TIMEOUT: Duration = Duration::from_secs(3);

/// Main application state
struct ItemCatalog {
    /// The item catalog
    library: Library,
    /// "Add Items" form state
    form: ItemForm,
    /// Lightbox state for the "View Items" page
    carousel: Carousel,
    /// Currently visible page
    page: Page,
    /// Banner shown above the form
    notice: Option<Notice>,
    /// Incremented for every notice so stale timers don't dismiss newer ones
    notice_id: u64,
    /// Remote images fetched this session
    images: ImageCache,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Switch page from the navigation bar
    Navigate(Page),
    NameChanged(String),
    TypeSelected(ItemType),
    DescriptionEdited(text_editor::Action),
    CoverImageChanged(String),
    AdditionalImagesEdited(text_editor::Action),
    /// User pressed "Add Item"
    Submit,
    /// Notice timer elapsed
    DismissNotice(u64),
    /// User clicked a gallery card
    OpenItem(ItemId),
    NextImage,
    PreviousImage,
    JumpToImage(usize),
    CloseViewer,
    /// A remote image download finished
    ImageFetched(String, Result<Vec<u8>, String>),
}

impl ItemCatalog {
    /// Create a new instance of the application
    fn new(library: Library, startup_warning: Option<String>) -> (Self, Task<Message>) {
        tracing::info!(count = library.len(), "item catalog initialized");

        let notice = startup_warning.or_else(|| {
            library
                .recovered_from_corrupt()
                .then(|| "Saved items could not be read. Starting with an empty catalog.".to_string())
        });

        (
            ItemCatalog {
                library,
                form: ItemForm::new(),
                carousel: Carousel::new(),
                page: Page::AddItems,
                notice: notice.map(Notice::Warning),
                notice_id: 0,
                images: ImageCache::new(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(page) => {
                tracing::debug!(?page, "navigate");
                self.page = page;
                self.carousel.close();
                if page == Page::ViewItems {
                    let covers: Vec<String> = self
                        .library
                        .items()
                        .iter()
                        .map(|item| item.cover_image.clone())
                        .collect();
                    self.fetch_images(covers)
                } else {
                    Task::none()
                }
            }
            Message::NameChanged(value) => {
                self.form.set_name(value);
                Task::none()
            }
            Message::TypeSelected(item_type) => {
                self.form.set_type(item_type);
                Task::none()
            }
            Message::DescriptionEdited(action) => {
                self.form.edit_description(action);
                Task::none()
            }
            Message::CoverImageChanged(value) => {
                self.form.set_cover_image(value);
                Task::none()
            }
            Message::AdditionalImagesEdited(action) => {
                self.form.edit_additional_images(action);
                Task::none()
            }
            Message::Submit => self.submit(),
            Message::DismissNotice(id) => {
                if id == self.notice_id {
                    self.notice = None;
                }
                Task::none()
            }
            Message::OpenItem(id) => {
                let Some(item) = self.library.get(id).cloned() else {
                    return Task::none();
                };
                let urls: Vec<String> = item.images().into_iter().map(str::to_string).collect();
                self.carousel.select(item);
                self.fetch_images(urls)
            }
            Message::NextImage => {
                self.carousel.next();
                Task::none()
            }
            Message::PreviousImage => {
                self.carousel.previous();
                Task::none()
            }
            Message::JumpToImage(index) => {
                if index < self.carousel.image_count() {
                    self.carousel.jump_to(index);
                }
                Task::none()
            }
            Message::CloseViewer => {
                self.carousel.close();
                Task::none()
            }
            Message::ImageFetched(url, result) => {
                self.images.finish(url, result);
                Task::none()
            }
        }
    }

    /// Start downloads for the remote images in `urls` that are not cached yet
    fn fetch_images(&mut self, urls: Vec<String>) -> Task<Message> {
        let tasks: Vec<Task<Message>> = urls
            .iter()
            .filter_map(|url| self.images.request(url))
            .map(|url| {
                tracing::debug!(%url, "fetching image");
                Task::perform(ui::image::fetch_image(url), |(url, result)| {
                    Message::ImageFetched(url, result)
                })
            })
            .collect();

        Task::batch(tasks)
    }

    fn submit(&mut self) -> Task<Message> {
        let Some(validated) = self.form.submit() else {
            return Task::none();
        };

        let notice = match self.library.add(validated) {
            Ok(_) => Notice::Success,
            // The item is still in the session, only the save failed
            Err(err) => Notice::Warning(format!("Item added, but it could not be saved: {err}")),
        };

        self.form.reset();
        self.show_notice(notice)
    }

    fn show_notice(&mut self, notice: Notice) -> Task<Message> {
        self.notice_id += 1;
        self.notice = Some(notice);

        let id = self.notice_id;
        Task::perform(tokio::time::sleep(NOTICE_TIMEOUT), move |_| {
            Message::DismissNotice(id)
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let page: Element<Message> = match self.page {
            Page::AddItems => self.form.view(self.notice.as_ref()),
            Page::ViewItems => ui::gallery::view(self.library.items(), &self.images),
        };

        let content = column![
            ui::navigation(self.page),
            container(scrollable(container(page).padding(24).width(Length::Fill)))
                .width(Length::Fill)
                .height(Length::Fill),
        ];

        match (self.page, self.carousel.selected()) {
            (Page::ViewItems, Some(_)) => ui::modal(
                content,
                ui::viewer::view(&self.carousel, &self.images),
                Message::CloseViewer,
            ),
            _ => content.into(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Open the on-disk catalog, falling back to an in-memory one for this session
fn open_library(config: &Config) -> (Library, Option<String>) {
    let storage: Result<Box<dyn Storage>, String> = SqliteStorage::open(&config.db_path())
        .map(|storage| Box::new(storage) as Box<dyn Storage>)
        .map_err(|err| err.to_string());

    let loaded = storage.and_then(|storage| Library::load(storage).map_err(|err| err.to_string()));

    match loaded {
        Ok(library) => (library, None),
        Err(err) => {
            tracing::error!(error = %err, "catalog unavailable, items will not be saved");
            (
                Library::empty(Box::new(MemoryStorage::new())),
                Some(format!("Catalog could not be opened ({err}). Items will not be saved.")),
            )
        }
    }
}

fn main() -> iced::Result {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (library, startup_warning) = open_library(&config);

    iced::application(
        "Item Management System",
        ItemCatalog::update,
        ItemCatalog::view,
    )
    .theme(ItemCatalog::theme)
    .window_size(Size::new(1200.0, 800.0))
    .centered()
    .run_with(move || ItemCatalog::new(library, startup_warning))
}

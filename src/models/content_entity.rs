//! Content entity model
//!
//! SeaORM entity for the content_entities table, the generalized row behind
//! the board's calendar events, announcements, categories, welcome cards and
//! carousel images. Lifecycle state lives in `is_active` (administrative
//! toggle) and `deleted_at` (soft-delete marker); the two are independent.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The content collection a row belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[sea_orm(string_value = "calendar_event")]
    CalendarEvent,
    #[sea_orm(string_value = "announcement")]
    Announcement,
    #[sea_orm(string_value = "category")]
    Category,
    #[sea_orm(string_value = "welcome_card")]
    WelcomeCard,
    #[sea_orm(string_value = "carousel_image")]
    CarouselImage,
}

impl ContentKind {
    /// Source table name used for audit attribution.
    pub fn target_table(&self) -> &'static str {
        match self {
            ContentKind::CalendarEvent => "school_calendar",
            ContentKind::Announcement => "announcements",
            ContentKind::Category => "categories",
            ContentKind::WelcomeCard => "welcome_cards",
            ContentKind::CarouselImage => "login_carousel_images",
        }
    }

    /// Whether rows of this kind start out active. Curated display
    /// collections (welcome cards, carousel images) stay hidden until an
    /// admin publishes them.
    pub fn default_active(&self) -> bool {
        !matches!(self, ContentKind::WelcomeCard | ContentKind::CarouselImage)
    }

    /// Only calendar events may carry the holiday-protection flag.
    pub fn supports_holiday_flag(&self) -> bool {
        matches!(self, ContentKind::CalendarEvent)
    }

    /// Only announcements carry a visibility window.
    pub fn supports_visibility_window(&self) -> bool {
        matches!(self, ContentKind::Announcement)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_entities")]
pub struct Model {
    /// Surrogate primary key, immutable once assigned
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Collection the row belongs to
    pub kind: ContentKind,

    /// Display title
    pub title: String,

    /// Optional body/content text
    pub body: Option<String>,

    /// Administrative toggle; false means hidden from display but not deleted
    pub is_active: bool,

    /// Holiday-protection flag (calendar events only); protected rows are
    /// excluded from bulk archival sweeps
    pub is_holiday: bool,

    /// Soft-delete marker; non-null means the row is archived
    pub deleted_at: Option<DateTimeWithTimeZone>,

    /// Start of the display window (announcements only; null = unbounded)
    pub visibility_start_at: Option<DateTimeWithTimeZone>,

    /// End of the display window (announcements only; null = unbounded)
    pub visibility_end_at: Option<DateTimeWithTimeZone>,

    /// Display position, unique among live rows of the same kind
    pub order_index: Option<i32>,

    /// Owning admin identifier
    pub created_by: i64,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

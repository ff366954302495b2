//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Vitals models
    ActionResponse,
    CleanupResponse,
    // Food models
    ClearJournalResponse,
    CreateBuddyRequest,
    CreateBuddyResponse,
    DrinkRequest,
    FeedRequest,
    FoodEntryResponse,
    FoodJournalQuery,
    NotificationResponse,
    PhotoFeedRequest,
    PhotoFeedResponse,
    SessionResponse,
    StepsRequest,
    TickRequest,
    TickResponse,
    VitalsResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Vitals endpoints
        super::vitals::create_buddy,
        super::vitals::get_buddy,
        super::vitals::get_user_buddy,
        super::vitals::cleanup_duplicates,
        super::vitals::tick,
        super::vitals::feed,
        super::vitals::drink,
        super::vitals::toggle_sleep,
        super::vitals::record_steps,
        // Food endpoints
        super::food::feed_photo,
        super::food::list_journal,
        super::food::clear_journal,
        // Session endpoints
        super::session::start_session,
        super::session::end_session,
    ),
    info(
        title = "Buddy API",
        version = "0.1.0",
        description = "Virtual buddy whose HP and energy follow your eating, drinking and sleeping.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Buddy", description = "Buddy - Creation and vitals updates"),
        (name = "Food", description = "Food - Photo feeding and the food journal"),
        (name = "Session", description = "Session - Periodic vitals ticks"),
    ),
    components(
        schemas(
            // Vitals
            VitalsResponse,
            CreateBuddyRequest,
            CreateBuddyResponse,
            TickRequest,
            TickResponse,
            NotificationResponse,
            FeedRequest,
            DrinkRequest,
            StepsRequest,
            ActionResponse,
            CleanupResponse,
            SessionResponse,
            // Food
            PhotoFeedRequest,
            PhotoFeedResponse,
            FoodEntryResponse,
            FoodJournalQuery,
            ClearJournalResponse,
        )
    ),
)]
pub struct ApiDoc;

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CourierFeaturesDoc {
    #[schema(minimum = 0, example = 5)]
    pub past_late_count: u32,
    #[schema(minimum = 0, example = 2)]
    pub leave_frequency: u32,
    /// Minutes, greater than zero.
    #[schema(example = 15.5)]
    pub avg_delivery_time: f64,
    #[schema(minimum = 0, maximum = 5, example = 4.2)]
    pub rating: f64,
}

#[derive(ToSchema)]
pub struct PredictionResultDoc {
    #[schema(example = "C001")]
    pub courier_id: String,
    #[schema(minimum = 0, maximum = 1, example = 0.42)]
    pub risk_score: f64,
    pub recommend_replacement: bool,
}

#[derive(ToSchema)]
pub struct CourierRecordDoc {
    pub id: Uuid,
    pub name: String,
    pub past_late_count: u32,
    pub leave_frequency: u32,
    pub avg_delivery_time: f64,
    pub rating: f64,
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct ErrorBodyDoc {
    #[schema(example = "Failed to get prediction from ML service.")]
    pub message: String,
    #[schema(example = "ML service timed out")]
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::predict::predict,
        crate::routes::metrics::metrics,
        crate::routes::couriers::list,
        crate::routes::couriers::get,
    ),
    components(
        schemas(
            HealthResponse,
            CourierFeaturesDoc,
            PredictionResultDoc,
            CourierRecordDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "prediction"),
        (name = "observability"),
        (name = "couriers")
    )
)]
pub struct ApiDoc;

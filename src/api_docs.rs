use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::artists::list_artists,
        api::artists::get_artist,
        api::artworks::list_artworks,
        api::artworks::get_artwork,
    ),
    tags(
        (name = "gallery", description = "Curated gallery API")
    )
)]
pub struct ApiDoc;

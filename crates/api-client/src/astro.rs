//! Zenith objects and star charts
//!
//! The zenith response is post-processed before it is handed out: a leading
//! solar entry is dropped and every object is decorated with a reference link
//! derived from its catalogue name.

use crate::http::{ApiClient, ApiRequest};
use crate::types::{AstroObject, AstroResponse, Coordinates, StarChart};
use crate::Result;
use tracing::debug;

/// Name the backend uses for the solar entry
pub const SOLAR_ENTRY_NAME: &str = "Sol";

/// Zoom level requested for star charts
pub const STAR_CHART_ZOOM: u8 = 9;

const HIPPARCOS_LOOKUP: &str =
    "https://hipparcos-tools.cosmos.esa.int/cgi-bin/HIPcatalogueSearch.pl?hipId=";
const SIMBAD_LOOKUP: &str = "https://simbad.u-strasbg.fr/simbad/sim-id?Ident=HD+";
const SIMBAD_LOOKUP_SUFFIX: &str = "&NbIdent=1&Radius=2&Radius.unit=arcmin&submit=submit+id";
const GENERIC_SEARCH: &str = "https://science.nasa.gov/?search=";

/// Reference link for an object name
///
/// `HIP <id>` links to the Hipparcos catalogue, `HD <id>` to Simbad, anything else
/// to a generic search carrying the name verbatim.
pub fn reference_link(name: &str) -> String {
    let catalogue_id = || name.split(' ').nth(1).unwrap_or_default();

    if name.starts_with("HIP ") {
        format!("{}{}", HIPPARCOS_LOOKUP, catalogue_id())
    } else if name.starts_with("HD ") {
        format!("{}{}{}", SIMBAD_LOOKUP, catalogue_id(), SIMBAD_LOOKUP_SUFFIX)
    } else {
        format!("{}{}", GENERIC_SEARCH, name)
    }
}

/// Drop a leading solar entry and decorate the remaining objects with links
pub fn prepare_zenith(mut response: AstroResponse) -> AstroResponse {
    if response
        .data
        .first()
        .is_some_and(|object| object.name == SOLAR_ENTRY_NAME)
    {
        response.data.remove(0);
    }

    for object in &mut response.data {
        decorate(object);
    }

    response
}

fn decorate(object: &mut AstroObject) {
    object.link = Some(reference_link(&object.name));
}

/// Fetch objects near the zenith at the given coordinates
pub async fn fetch_astro(client: &ApiClient, coords: &Coordinates) -> Result<AstroResponse> {
    let path = format!("/api/v1/astro/zenith/{}", coords.path_segment());
    debug!("Fetching astro data from {}", path);

    let response: AstroResponse = client.get_json(ApiRequest::get(path)).await?;
    Ok(prepare_zenith(response))
}

/// Fetch a rendered star chart for the given coordinates
pub async fn fetch_star_chart(client: &ApiClient, coords: &Coordinates) -> Result<StarChart> {
    let path = format!("/api/v1/astro/zenith/starchart/{}", coords.path_segment());
    debug!("Fetching star chart from {}?zoom={}", path, STAR_CHART_ZOOM);

    client
        .get_json(ApiRequest::get(path).param("zoom", STAR_CHART_ZOOM.to_string()))
        .await
}

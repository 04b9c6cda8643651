use crate::location::{LocationResolver, NominatimProvider};

pub struct AppState {
    pub resolver: LocationResolver<NominatimProvider>,
}

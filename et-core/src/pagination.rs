use std::any::type_name;
use std::future::Future;

use anyhow::Result;
use tracing::{event, trace_span, Instrument, Level};

#[derive(Debug, Clone)]
pub struct PaginationInput {
    pub page: u32,
}

/// One page of a paginated listing plus the total page count the server announced.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_pages: u32,
}

/// Walks pages 1..=total_pages, stopping early at the first empty page.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(PaginationInput) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all_data = Vec::new();
    let mut current_input = PaginationInput { page: 1 };

    let output_parameter_type_name = type_name::<T>();

    let span = trace_span!("pagination");

    let mut total_number_of_pages = 1;

    async move {
        event!(Level::TRACE, "Start downloading all pages of type {}", output_parameter_type_name);

        while current_input.page <= total_number_of_pages {
            let response = fetch_page(current_input.clone()).await?;
            total_number_of_pages = response.total_pages;

            event!(Level::TRACE, "Downloaded page {} of {}", current_input.page, total_number_of_pages);

            if response.data.is_empty() {
                break;
            }
            all_data.extend(response.data);

            current_input.page += 1;
        }

        event!(Level::TRACE, "Done downloading {} entries", all_data.len());
        Ok(all_data)
    }
    .instrument(span)
    .await
}

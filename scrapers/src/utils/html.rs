use scraper::{ElementRef, Selector};

use crate::errors::ScraperError;

pub(crate) fn selector(query: &str) -> Result<Selector, ScraperError> {
    Selector::parse(query).map_err(|err| ScraperError::InvalidSelector(format!("{query}: {err:?}")))
}

/// Text content with runs of whitespace collapsed, the vendor pages wrap cells over several lines
pub(crate) fn element_to_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<&str>>()
        .join(" ")
}

pub(crate) fn element_has_attr(element: ElementRef, attr_name: &str) -> bool {
    element.attr(attr_name).is_some()
}

/// Every `th`/`td` in a row, in document order
pub(crate) fn row_cells<'a>(row: ElementRef<'a>, cell_selector: &Selector) -> Vec<ElementRef<'a>> {
    row.select(cell_selector).collect()
}

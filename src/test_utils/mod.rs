#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod store;

pub(crate) use html::{
    assert_valid_html, parse_html_document, parse_html_fragment, parse_table_cells,
};
pub(crate) use http::{assert_content_type, assert_status_ok, get_header, response_json};
pub(crate) use store::{FailingStore, SlowStore};

//! List pagination context sent as the `data` query parameter of list calls.

// self
use crate::_prelude::*;

/// `response_option` value asking the service for pagination metadata only.
pub const RESPONSE_OPTION_PAGINATION_ONLY: u8 = 2;

/// Sort direction of a list call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
	/// Ascending.
	Asc,
	/// Descending.
	#[default]
	Desc,
}

/// Pagination, sorting, and filtering of a list call.
///
/// Serializes to `{"row_count", "start_index", "sort_column", "sort_order"}` plus
/// `search_columns` and `response_option` when set; [`PageContext::to_query_value`] wraps it in
/// the `page_context` envelope the service expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageContext {
	row_count: u32,
	start_index: u32,
	sort_column: String,
	sort_order: SortOrder,
	#[serde(skip_serializing_if = "JsonMap::is_empty")]
	search_columns: JsonMap<String, JsonValue>,
	#[serde(skip_serializing_if = "Option::is_none")]
	response_option: Option<u8>,
}
impl PageContext {
	/// Default page size.
	pub const DEFAULT_ROW_COUNT: u32 = 10;
	/// Default sort column.
	pub const DEFAULT_SORT_COLUMN: &'static str = "created_time";

	/// Sets the 1-based index of the first row; `0` is treated as `1`.
	pub fn start_index(mut self, start_index: u32) -> Self {
		self.start_index = start_index.max(1);

		self
	}

	/// Sets the page size.
	pub fn row_count(mut self, row_count: u32) -> Self {
		self.row_count = row_count;

		self
	}

	/// Sets the sort column.
	pub fn sort_column(mut self, column: impl Into<String>) -> Self {
		self.sort_column = column.into();

		self
	}

	/// Sets the sort direction.
	pub fn sort_order(mut self, order: SortOrder) -> Self {
		self.sort_order = order;

		self
	}

	/// Adds a `search_columns` filter.
	pub fn search(mut self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.search_columns.insert(column.into(), value.into());

		self
	}

	/// Sets the `response_option`.
	pub fn response_option(mut self, option: u8) -> Self {
		self.response_option = Some(option);

		self
	}

	/// Context used to fetch only the pagination metadata (record totals).
	pub fn pagination_only() -> Self {
		Self::default().response_option(RESPONSE_OPTION_PAGINATION_ONLY)
	}

	/// Index of the first row.
	pub fn first_row(&self) -> u32 {
		self.start_index
	}

	/// Value of the `data` query parameter: `{"page_context": {...}}` as JSON text.
	pub fn to_query_value(&self) -> String {
		serde_json::json!({ "page_context": self }).to_string()
	}
}
impl Default for PageContext {
	fn default() -> Self {
		Self {
			row_count: Self::DEFAULT_ROW_COUNT,
			start_index: 1,
			sort_column: Self::DEFAULT_SORT_COLUMN.into(),
			sort_order: SortOrder::default(),
			search_columns: JsonMap::new(),
			response_option: None,
		}
	}
}

use feruca::Collator;
use log::debug;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::category_tree::{CategoryTree, ExpandedSet};
use super::request_guard::{LoadState, RequestGuard, RequestTicket};
use crate::models::{Category, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
	NameAsc,
	NameDesc,
	#[default]
	Newest,
	Oldest,
}

impl FromStr for SortOption {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"name-asc" => Ok(SortOption::NameAsc),
			"name-desc" => Ok(SortOption::NameDesc),
			"newest" => Ok(SortOption::Newest),
			"oldest" => Ok(SortOption::Oldest),
			other => Err(format!("unknown sort option {:?}", other)),
		}
	}
}

impl fmt::Display for SortOption {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let token = match self {
			SortOption::NameAsc => "name-asc",
			SortOption::NameDesc => "name-desc",
			SortOption::Newest => "newest",
			SortOption::Oldest => "oldest",
		};
		f.write_str(token)
	}
}

/// Names go through the Unicode collation algorithm (CLDR root order), so
/// "Éprouvette" sorts next to "Etuve" instead of after "Zentrifuge".
fn compare(collator: &mut Collator, sort: SortOption, a: &Product, b: &Product) -> Ordering {
	match sort {
		SortOption::NameAsc => collator.collate(a.name.as_str(), b.name.as_str()),
		SortOption::NameDesc => collator.collate(b.name.as_str(), a.name.as_str()),
		SortOption::Newest => b.created_at.cmp(&a.created_at),
		SortOption::Oldest => a.created_at.cmp(&b.created_at),
	}
}

/// Filter, search and sort `products`. Pure: same inputs, same output.
pub fn derive_view<'a>(
	products: &'a [Product],
	tree: &CategoryTree,
	category: Option<&str>,
	search: &str,
	sort: SortOption,
) -> Vec<&'a Product> {
	let filter_set = category
		.filter(|id| !id.is_empty())
		.map(|id| tree.resolve_filter_set(id));
	let needle = search.to_lowercase();

	let mut view: Vec<&Product> = products
		.iter()
		.filter(|product| match &filter_set {
			Some(set) => product.category_id().map(|id| set.contains(id)).unwrap_or(false),
			None => true,
		})
		.filter(|product| needle.is_empty() || product.matches_search(&needle))
		.collect();

	let mut collator = Collator::default();
	view.sort_by(|a, b| compare(&mut collator, sort, a, b));
	view
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'a> {
	pub items: Vec<&'a Product>,
	pub page: usize,
	pub total_pages: usize,
	pub total_items: usize,
}

/// State behind the Home, Products and Catalog screens.
#[derive(Debug, Clone)]
pub struct CatalogView {
	products: Vec<Product>,
	tree: CategoryTree,
	expanded: ExpandedSet,
	category_filter: Option<String>,
	search_term: String,
	sort: SortOption,
	selected_product: Option<String>,
	page: usize,
	page_size: usize,
	guard: RequestGuard,
	state: LoadState,
}

impl CatalogView {
	pub fn new(page_size: usize) -> Self {
		CatalogView {
			products: Vec::new(),
			tree: CategoryTree::default(),
			expanded: ExpandedSet::default(),
			category_filter: None,
			search_term: String::new(),
			sort: SortOption::default(),
			selected_product: None,
			page: 1,
			page_size: page_size.max(1),
			guard: RequestGuard::default(),
			state: LoadState::Idle,
		}
	}

	pub fn set_categories(&mut self, categories: &[Category]) {
		self.tree = CategoryTree::build(categories);
		self.expand_parent_of_filter();
	}

	pub fn tree(&self) -> &CategoryTree {
		&self.tree
	}

	pub fn state(&self) -> &LoadState {
		&self.state
	}

	pub fn begin_load(&mut self) -> RequestTicket {
		self.state = LoadState::Loading;
		self.guard.begin()
	}

	/// Returns `false` when a newer load superseded `ticket` and the list was dropped.
	pub fn apply_products(&mut self, ticket: RequestTicket, products: Vec<Product>) -> bool {
		if !self.guard.is_current(ticket) {
			debug!("dropping stale product list ({} items)", products.len());
			return false;
		}
		self.products = products;
		self.state = LoadState::Ready;
		self.clamp_page();
		true
	}

	pub fn fail_load(&mut self, ticket: RequestTicket, message: String) -> bool {
		if !self.guard.is_current(ticket) {
			return false;
		}
		self.state = LoadState::Failed(message);
		true
	}

	pub fn products(&self) -> &[Product] {
		&self.products
	}

	pub fn category_filter(&self) -> Option<&str> {
		self.category_filter.as_deref()
	}

	pub fn search_term(&self) -> &str {
		&self.search_term
	}

	pub fn sort(&self) -> SortOption {
		self.sort
	}

	/// Changing the category always drops the product drill-down.
	///
	/// Going from a category back to "all" invalidates loads still in flight,
	/// since they were scoped to the old category. A pending load is then
	/// reported as `Idle` so the caller issues a fresh unscoped one.
	pub fn set_category(&mut self, category: Option<&str>) {
		let had_filter = self.category_filter.is_some();
		self.category_filter = category
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.map(str::to_string);
		self.selected_product = None;
		self.page = 1;
		if had_filter && self.category_filter.is_none() {
			self.guard.invalidate();
			if self.state.is_loading() {
				self.state = LoadState::Idle;
			}
		}
		self.expand_parent_of_filter();
	}

	fn expand_parent_of_filter(&mut self) {
		let parent = self
			.category_filter
			.as_deref()
			.and_then(|id| self.tree.parent_of(id))
			.map(str::to_string);
		if let Some(parent) = parent {
			self.expanded.expand(&parent);
		}
	}

	pub fn set_search(&mut self, term: &str) {
		self.search_term = term.to_string();
		self.page = 1;
	}

	pub fn set_sort(&mut self, sort: SortOption) {
		self.sort = sort;
		self.page = 1;
	}

	pub fn toggle_category(&mut self, id: &str) {
		self.expanded.toggle(id);
	}

	pub fn expanded(&self) -> &ExpandedSet {
		&self.expanded
	}

	pub fn select_product(&mut self, id: Option<&str>) {
		self.selected_product = id.map(str::to_string);
	}

	/// `None` either when nothing is selected or the id is unknown ("not found" state).
	pub fn selected_product(&self) -> Option<&Product> {
		self.selected_product.as_deref().and_then(|id| self.find(id))
	}

	pub fn find(&self, id: &str) -> Option<&Product> {
		self.products.iter().find(|product| product.id == id)
	}

	pub fn derive(&self) -> Vec<&Product> {
		derive_view(
			&self.products,
			&self.tree,
			self.category_filter.as_deref(),
			&self.search_term,
			self.sort,
		)
	}

	/// Active featured products in manual order, for the home page.
	pub fn featured(&self) -> Vec<&Product> {
		let mut featured: Vec<&Product> = self
			.products
			.iter()
			.filter(|product| product.featured && product.is_active)
			.collect();
		featured.sort_by_key(|product| product.order);
		featured
	}

	pub fn set_page(&mut self, page: usize) {
		self.page = page.max(1);
		self.clamp_page();
	}

	fn clamp_page(&mut self) {
		let total_pages = self.total_pages(self.derive().len());
		self.page = self.page.clamp(1, total_pages);
	}

	fn total_pages(&self, total_items: usize) -> usize {
		total_items.div_ceil(self.page_size).max(1)
	}

	pub fn page_slice(&self) -> PageSlice<'_> {
		let view = self.derive();
		let total_items = view.len();
		let total_pages = self.total_pages(total_items);
		let page = self.page.clamp(1, total_pages);
		let items = view
			.into_iter()
			.skip((page - 1) * self.page_size)
			.take(self.page_size)
			.collect();

		PageSlice {
			items,
			page,
			total_pages,
			total_items,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::EntityRef;
	use chrono::{TimeZone, Utc};

	fn product(id: &str, name: &str, category: &str, day: Option<u32>) -> Product {
		Product {
			id: id.to_string(),
			name: name.to_string(),
			category: Some(EntityRef::Id(category.to_string())),
			created_at: day.map(|day| Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
			..Default::default()
		}
	}

	fn scenario_categories() -> Vec<Category> {
		vec![
			Category {
				id: "A".to_string(),
				subcategories: vec![Category {
					id: "A1".to_string(),
					..Default::default()
				}],
				..Default::default()
			},
			Category {
				id: "B".to_string(),
				..Default::default()
			},
		]
	}

	fn loaded(products: Vec<Product>) -> CatalogView {
		let mut view = CatalogView::new(2);
		view.set_categories(&scenario_categories());
		let ticket = view.begin_load();
		assert!(view.apply_products(ticket, products));
		view
	}

	fn ids(products: &[&Product]) -> Vec<String> {
		products.iter().map(|product| product.id.clone()).collect()
	}

	#[test]
	fn sort_option_tokens() {
		for token in ["name-asc", "name-desc", "newest", "oldest"] {
			assert_eq!(token.parse::<SortOption>().unwrap().to_string(), token);
		}
		assert!("price".parse::<SortOption>().is_err());
	}

	#[test]
	fn category_scenario() {
		let mut view = loaded(vec![
			product("1", "One", "A", Some(3)),
			product("2", "Two", "A1", Some(2)),
			product("3", "Three", "B", Some(1)),
		]);

		view.set_category(Some("A"));
		assert_eq!(ids(&view.derive()), vec!["1", "2"]);

		view.set_category(Some("A1"));
		assert_eq!(ids(&view.derive()), vec!["2"]);
		assert!(view.expanded().is_expanded("A"));

		view.set_category(Some(""));
		assert_eq!(ids(&view.derive()), vec!["1", "2", "3"]);
	}

	#[test]
	fn embedded_category_objects_are_matched_by_id() {
		let mut embedded = product("9", "Nine", "ignored", None);
		embedded.category = Some(EntityRef::Embedded(Box::new(Category {
			id: "B".to_string(),
			..Default::default()
		})));
		let mut orphan = product("10", "Ten", "ignored", None);
		orphan.category = None;

		let mut view = loaded(vec![embedded, orphan]);
		view.set_category(Some("B"));
		assert_eq!(ids(&view.derive()), vec!["9"]);
	}

	#[test]
	fn no_filters_is_a_stable_sort() {
		let products = vec![
			product("1", "beta", "B", Some(2)),
			product("2", "Alpha", "B", Some(2)),
			product("3", "Alpha", "B", None),
			product("4", "Gamma", "B", Some(5)),
		];
		let tree = CategoryTree::default();

		let newest = derive_view(&products, &tree, None, "", SortOption::Newest);
		assert_eq!(ids(&newest), vec!["4", "1", "2", "3"]);

		let oldest = derive_view(&products, &tree, None, "", SortOption::Oldest);
		assert_eq!(ids(&oldest), vec!["3", "1", "2", "4"]);

		let asc = derive_view(&products, &tree, None, "", SortOption::NameAsc);
		assert_eq!(ids(&asc), vec!["2", "3", "1", "4"]);

		let desc = derive_view(&products, &tree, None, "", SortOption::NameDesc);
		assert_eq!(ids(&desc), vec!["4", "1", "2", "3"]);
	}

	#[test]
	fn name_desc_reverses_name_asc_without_ties() {
		let products = vec![
			product("1", "Pipette", "B", None),
			product("2", "autoclave", "B", None),
			product("3", "Microscope", "B", None),
		];
		let tree = CategoryTree::default();
		let mut asc = ids(&derive_view(&products, &tree, None, "", SortOption::NameAsc));
		let desc = ids(&derive_view(&products, &tree, None, "", SortOption::NameDesc));
		asc.reverse();
		assert_eq!(asc, desc);
	}

	#[test]
	fn search_is_case_insensitive_substring() {
		let mut microscope = product("1", "Microscope", "B", None);
		microscope.order_code = "MIC-100".to_string();
		let mut view = loaded(vec![microscope, product("2", "Autoclave", "B", None)]);

		view.set_search("mic-1");
		assert_eq!(ids(&view.derive()), vec!["1"]);
		view.set_search("CLAVE");
		assert_eq!(ids(&view.derive()), vec!["2"]);
		view.set_search("");
		assert_eq!(view.derive().len(), 2);
	}

	#[test]
	fn search_term_is_matched_as_given() {
		let mut view = loaded(vec![
			product("1", "Drying Oven", "B", None),
			product("2", "Autoclave", "B", None),
		]);

		view.set_search(" ");
		assert_eq!(ids(&view.derive()), vec!["1"]);
		view.set_search(" autoclave");
		assert!(view.derive().is_empty());
	}

	#[test]
	fn accented_names_sort_with_their_base_letter() {
		let products = vec![
			product("z", "Zentrifuge", "B", None),
			product("e1", "Éprouvette", "B", None),
			product("e2", "Etuve", "B", None),
		];
		let tree = CategoryTree::default();

		let asc = derive_view(&products, &tree, None, "", SortOption::NameAsc);
		assert_eq!(ids(&asc), vec!["e1", "e2", "z"]);
		let desc = derive_view(&products, &tree, None, "", SortOption::NameDesc);
		assert_eq!(ids(&desc), vec!["z", "e2", "e1"]);
	}

	#[test]
	fn changing_category_resets_drill_down_and_page() {
		let mut view = loaded(vec![
			product("1", "a", "B", None),
			product("2", "b", "B", None),
			product("3", "c", "B", None),
		]);
		view.select_product(Some("2"));
		view.set_page(2);
		assert_eq!(view.selected_product().map(|p| p.id.as_str()), Some("2"));
		assert_eq!(view.page_slice().page, 2);

		view.set_category(Some("B"));
		assert!(view.selected_product().is_none());
		assert_eq!(view.page_slice().page, 1);
	}

	#[test]
	fn pagination_slices_and_clamps() {
		let mut view = loaded(vec![
			product("1", "a", "B", None),
			product("2", "b", "B", None),
			product("3", "c", "B", None),
		]);
		view.set_sort(SortOption::NameAsc);

		let first = view.page_slice();
		assert_eq!(ids(&first.items), vec!["1", "2"]);
		assert_eq!(first.total_pages, 2);
		assert_eq!(first.total_items, 3);

		view.set_page(9);
		let last = view.page_slice();
		assert_eq!(last.page, 2);
		assert_eq!(ids(&last.items), vec!["3"]);

		view.set_search("nothing matches");
		let empty = view.page_slice();
		assert_eq!((empty.page, empty.total_pages, empty.items.len()), (1, 1, 0));
	}

	#[test]
	fn stale_loads_are_dropped() {
		let mut view = CatalogView::new(10);
		let stale = view.begin_load();
		let fresh = view.begin_load();
		assert!(view.state().is_loading());

		assert!(view.apply_products(fresh, vec![product("new", "n", "B", None)]));
		assert!(!view.apply_products(stale, vec![product("old", "o", "B", None)]));
		assert!(!view.fail_load(stale, "late failure".to_string()));
		assert_eq!(ids(&view.derive()), vec!["new"]);
		assert_eq!(view.state(), &LoadState::Ready);
	}

	#[test]
	fn clearing_the_category_drops_scoped_fetches() {
		let mut view = CatalogView::new(10);
		view.set_category(Some("A"));
		let scoped = view.begin_load();
		view.set_category(None);
		assert_eq!(view.state(), &LoadState::Idle);
		assert!(!view.apply_products(scoped, vec![product("1", "a", "A", None)]));
	}

	#[test]
	fn picking_all_keeps_an_unscoped_load() {
		let mut view = CatalogView::new(10);
		let ticket = view.begin_load();
		view.set_category(None);
		assert!(view.state().is_loading());

		assert!(view.apply_products(ticket, vec![product("1", "a", "A", None)]));
		assert_eq!(view.state(), &LoadState::Ready);
		assert_eq!(ids(&view.derive()), vec!["1"]);
	}

	#[test]
	fn featured_products_in_manual_order() {
		let mut first = product("1", "a", "B", None);
		first.featured = true;
		first.is_active = true;
		first.order = 2;
		let mut second = product("2", "b", "B", None);
		second.featured = true;
		second.is_active = true;
		second.order = 1;
		let mut hidden = product("3", "c", "B", None);
		hidden.featured = true;
		hidden.is_active = false;

		let view = loaded(vec![first, second, hidden]);
		assert_eq!(ids(&view.featured()), vec!["2", "1"]);
	}

	#[test]
	fn unknown_product_is_not_found() {
		let mut view = loaded(vec![product("1", "a", "B", None)]);
		view.select_product(Some("missing"));
		assert!(view.selected_product().is_none());
		assert!(view.find("1").is_some());
	}
}

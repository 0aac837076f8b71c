use log::warn;
use std::collections::{HashMap, HashSet};

use crate::models::Category;

#[derive(Debug, Clone)]
struct Node {
	category: Category,
	children: Vec<Category>,
}

/// Two-level category tree shared by every screen that filters or lists categories.
///
/// Accepts both shapes the API returns: roots carrying embedded `subcategories`,
/// and flat lists where children point at their root through `parent`.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
	roots: Vec<Node>,
	parents: HashMap<String, String>,
	skipped: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow<'a> {
	pub category: &'a Category,
	pub depth: usize,
	pub label: String,
}

impl CategoryTree {
	pub fn build(categories: &[Category]) -> Self {
		let mut tree = CategoryTree::default();
		let mut pending = Vec::new();

		for category in categories {
			match category.parent_id() {
				Some(parent) if parent != category.id => pending.push(category.clone()),
				_ => {
					if tree.root_index(&category.id).is_some() {
						continue;
					}
					let mut root = category.clone();
					let embedded = std::mem::take(&mut root.subcategories);
					tree.roots.push(Node {
						category: root,
						children: Vec::new(),
					});
					for child in embedded {
						pending.push(Category {
							parent: Some(crate::models::EntityRef::Id(category.id.clone())),
							..child
						});
					}
				}
			}
		}

		for child in pending {
			tree.attach(child);
		}

		tree
	}

	fn root_index(&self, id: &str) -> Option<usize> {
		self.roots.iter().position(|node| node.category.id == id)
	}

	fn attach(&mut self, mut child: Category) {
		let parent_id = child.parent_id().unwrap_or_default().to_string();

		if self.root_index(&child.id).is_some() || self.parents.contains_key(&child.id) {
			return;
		}

		let Some(index) = self.root_index(&parent_id) else {
			warn!(
				"category {} ({}) skipped: parent {} is not a root category",
				child.id, child.name, parent_id
			);
			self.skipped.push(child);
			return;
		};

		if !child.subcategories.is_empty() {
			warn!(
				"category {} has nested subcategories beyond two levels, ignoring them",
				child.id
			);
			self.skipped.extend(std::mem::take(&mut child.subcategories));
		}

		self.parents.insert(child.id.clone(), parent_id);
		self.roots[index].children.push(child);
	}

	pub fn roots(&self) -> impl Iterator<Item = &Category> {
		self.roots.iter().map(|node| &node.category)
	}

	pub fn children_of(&self, id: &str) -> &[Category] {
		self.root_index(id)
			.map(|index| self.roots[index].children.as_slice())
			.unwrap_or(&[])
	}

	pub fn parent_of(&self, id: &str) -> Option<&str> {
		self.parents.get(id).map(String::as_str)
	}

	pub fn is_root(&self, id: &str) -> bool {
		self.root_index(id).is_some()
	}

	pub fn get(&self, id: &str) -> Option<&Category> {
		self.roots.iter().find_map(|node| {
			if node.category.id == id {
				Some(&node.category)
			} else {
				node.children.iter().find(|child| child.id == id)
			}
		})
	}

	/// Categories that did not fit into a two-level tree.
	pub fn skipped(&self) -> &[Category] {
		&self.skipped
	}

	/// The selected category plus, for a root, all of its direct subcategories.
	pub fn resolve_filter_set(&self, selected: &str) -> HashSet<String> {
		let mut set = HashSet::from([selected.to_string()]);
		set.extend(self.children_of(selected).iter().map(|child| child.id.clone()));
		set
	}

	/// Each root immediately followed by its subcategories, for the admin table.
	pub fn flatten_for_admin(&self) -> Vec<FlatRow<'_>> {
		let mut rows = Vec::new();
		for node in &self.roots {
			rows.push(FlatRow {
				category: &node.category,
				depth: 0,
				label: node.category.name.clone(),
			});
			for child in &node.children {
				rows.push(FlatRow {
					category: child,
					depth: 1,
					label: format!("— {}", child.name),
				});
			}
		}
		rows
	}
}

/// Roots whose subcategory list is open in the sidebar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedSet {
	ids: HashSet<String>,
}

impl ExpandedSet {
	pub fn expand(&mut self, id: &str) {
		self.ids.insert(id.to_string());
	}

	pub fn collapse(&mut self, id: &str) {
		self.ids.remove(id);
	}

	pub fn toggle(&mut self, id: &str) {
		if !self.ids.remove(id) {
			self.ids.insert(id.to_string());
		}
	}

	pub fn is_expanded(&self, id: &str) -> bool {
		self.ids.contains(id)
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

use dotenv::dotenv;
use lab_catalog::api::confirm_deletion;
use lab_catalog::catalog::{CatalogView, SortOption};
use lab_catalog::models::{AdminStats, Category, Enquiry, EnquiryForm, NewsItem, Product, ProductQuery};
use lab_catalog::services::{self, DirectorySink, FileTokenStore, Delivery};
use lab_catalog::{ApiClient, ApiError, Config, Session};
use log::error;
use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

/// Splits argv into the command name and the positional arguments after it.
/// A command taken from the environment leaves every argument positional.
fn split_command(args: &[String], from_env: Option<String>) -> (String, &[String]) {
	let rest = args.get(1..).unwrap_or_default();
	match from_env {
		Some(command) => (command, rest),
		None => match rest.split_first() {
			Some((command, positional)) => (command.clone(), positional),
			None => (String::new(), rest),
		},
	}
}

/// Positional argument `n`, or the named env variable.
fn arg_or_env(args: &[String], n: usize, key: &str) -> Option<String> {
	args.get(n)
		.cloned()
		.or_else(|| env::var(key).ok())
		.filter(|value| !value.trim().is_empty())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	dotenv().ok();

	if std::env::var_os("RUST_LOG").is_none() {
		std::env::set_var("RUST_LOG", "lab_catalog=info");
	}
	env_logger::init();

	let config = Config::init();
	let session = Arc::new(Session::new(Box::new(FileTokenStore::new(&config.token_path))));
	let api = ApiClient::new(&config, session)?;

	let argv: Vec<String> = env::args().collect();
	let (command, args) = split_command(&argv, env::var("CATALOG_COMMAND").ok());

	let result = match command.as_str() {
		"products" => products(&api, &config, args).await,
		"featured" => featured(&api).await,
		"product" => product(&api, args).await,
		"categories" => categories(&api).await,
		"news" => news(&api).await,
		"enquiry" => enquiry(&api, &config, args).await,
		"login" => login(&api, args).await,
		"logout" => {
			services::logout(&api);
			println!("Logged out");
			Ok(())
		}
		"whoami" => whoami(&api).await,
		"stats" => stats(&api).await,
		"enquiries" => enquiries(&api).await,
		"delete-enquiry" => delete_enquiry(&api, args).await,
		_ => {
			println!("error in command (no such handler): {:?}", command);
			Ok(())
		}
	};

	match result {
		Err(ApiError::Unauthorized) => println!("Please log in to continue."),
		Err(e) => {
			error!("{} failed: {}", command, e);
			println!("{}", e.user_message());
		}
		Ok(()) => {}
	}

	Ok(())
}

async fn products(api: &ApiClient, config: &Config, args: &[String]) -> Result<(), ApiError> {
	let mut view = CatalogView::new(config.page_size);
	view.set_categories(&Category::get_categories(api).await?);

	let ticket = view.begin_load();
	match Product::get_products(api, &ProductQuery::default()).await {
		Ok(list) => {
			view.apply_products(ticket, list);
		}
		Err(e) => {
			view.fail_load(ticket, e.user_message());
			return Err(e);
		}
	}

	view.set_category(arg_or_env(args, 0, "CATEGORY").as_deref());
	if let Some(search) = arg_or_env(args, 1, "SEARCH") {
		view.set_search(&search);
	}
	if let Some(sort) = arg_or_env(args, 2, "SORT") {
		let sort = sort.parse::<SortOption>().map_err(ApiError::Validation)?;
		view.set_sort(sort);
	}
	if let Some(page) = arg_or_env(args, 3, "PAGE") {
		view.set_page(page.parse().unwrap_or(1));
	}

	let slice = view.page_slice();
	println!(
		"Page {}/{} ({} products, sorted {})",
		slice.page,
		slice.total_pages,
		slice.total_items,
		view.sort()
	);
	for product in slice.items {
		println!("{:<26} {:<14} {}", product.id, product.order_code, product.name);
	}

	Ok(())
}

async fn featured(api: &ApiClient) -> Result<(), ApiError> {
	for product in Product::get_products(api, &ProductQuery::featured()).await? {
		let image = product
			.images
			.first()
			.map(|image| api.image_url(image))
			.unwrap_or_default();
		println!("{} {} {}", product.order_code, product.name, image);
	}
	Ok(())
}

async fn product(api: &ApiClient, args: &[String]) -> Result<(), ApiError> {
	let id = arg_or_env(args, 0, "PRODUCT_ID")
		.ok_or(ApiError::Validation("Product id is required".to_string()))?;

	match Product::get_product(api, &id).await {
		Ok(product) => {
			println!("{} ({})", product.name, product.order_code);
			println!("Price: {}", product.price);
			for image in &product.images {
				println!("Image: {}", api.image_url(image));
			}
			if let Some(brochure) = &product.brochure {
				println!("Brochure: {}", api.image_url(&brochure.url));
			}
			println!("{}", product.description);
			Ok(())
		}
		Err(ApiError::NotFound) => {
			println!("Product {} not found. Try `products` to browse the catalog.", id);
			Ok(())
		}
		Err(e) => Err(e),
	}
}

async fn categories(api: &ApiClient) -> Result<(), ApiError> {
	services::restore(api).await;
	let categories = if api.session().is_admin() {
		Category::get_all_categories(api).await?
	} else {
		Category::get_categories(api).await?
	};

	let tree = lab_catalog::catalog::CategoryTree::build(&categories);
	for row in tree.flatten_for_admin() {
		let status = if row.category.is_active { "" } else { " (inactive)" };
		println!("{:<26} {}{}", row.category.id, row.label, status);
	}
	Ok(())
}

async fn news(api: &ApiClient) -> Result<(), ApiError> {
	for item in NewsItem::get_news(api).await? {
		let date = item
			.created_at
			.map(|ts| ts.format("%Y-%m-%d").to_string())
			.unwrap_or_default();
		println!("{} {}", date, item.title);
		if let Some(url) = &item.original_url {
			println!("    {}", url);
		}
	}
	Ok(())
}

async fn enquiry(api: &ApiClient, config: &Config, args: &[String]) -> Result<(), ApiError> {
	let form = EnquiryForm {
		product_id: arg_or_env(args, 0, "PRODUCT_ID").unwrap_or_default(),
		email: arg_or_env(args, 1, "EMAIL").unwrap_or_default(),
		phone: arg_or_env(args, 2, "PHONE").unwrap_or_default(),
		name: arg_or_env(args, 3, "NAME").unwrap_or_default(),
		message: arg_or_env(args, 4, "MESSAGE").unwrap_or_default(),
	};

	let product_name = match Product::get_product(api, &form.product_id).await {
		Ok(product) => product.name,
		Err(_) => form.product_id.clone(),
	};

	let mut sink = DirectorySink::new(&config.download_dir);
	match services::submit_enquiry(api, &form, &product_name, &mut sink).await {
		Ok(Delivery::Opened(url)) => println!("Thank you! Brochure: {}", url),
		Ok(Delivery::Saved(file_name)) => println!("Thank you! Brochure saved as {}", file_name),
		Ok(Delivery::Acknowledged(message)) => {
			println!("{}", message.unwrap_or("Thank you! We will contact you soon.".to_string()))
		}
		Err(e) => println!("{}", e),
	}
	Ok(())
}

async fn login(api: &ApiClient, args: &[String]) -> Result<(), ApiError> {
	let email = arg_or_env(args, 0, "EMAIL").unwrap_or_default();
	let password = arg_or_env(args, 1, "PASSWORD").unwrap_or_default();

	match services::login(api, &email, &password).await {
		Ok(user) => {
			println!("Welcome, {}", user.name);
			Ok(())
		}
		Err(ApiError::Unauthorized) => {
			println!("Access denied: admin account required");
			Ok(())
		}
		Err(e) => Err(e),
	}
}

async fn whoami(api: &ApiClient) -> Result<(), ApiError> {
	match services::restore(api).await {
		Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
		None => println!("Not logged in"),
	}
	Ok(())
}

async fn stats(api: &ApiClient) -> Result<(), ApiError> {
	services::restore(api).await;
	let stats = AdminStats::get_stats(api).await?;
	println!(
		"Products:   {} ({} active, {} inactive)",
		stats.total_products, stats.active_products, stats.inactive_products
	);
	println!(
		"Categories: {} ({} active, {} inactive)",
		stats.total_categories, stats.active_categories, stats.inactive_categories
	);
	println!(
		"Enquiries:  {} ({} in the last 7 days)",
		stats.total_enquiries, stats.recent_enquiries
	);
	Ok(())
}

async fn enquiries(api: &ApiClient) -> Result<(), ApiError> {
	services::restore(api).await;
	api.session().require_admin()?;
	for enquiry in Enquiry::get_enquiries(api).await? {
		println!(
			"{:<26} {:<28} {:<16} {}",
			enquiry.id,
			enquiry.email,
			enquiry.phone,
			enquiry.product_name()
		);
	}
	Ok(())
}

async fn delete_enquiry(api: &ApiClient, args: &[String]) -> Result<(), ApiError> {
	services::restore(api).await;
	api.session().require_admin()?;
	let id = arg_or_env(args, 0, "ENQUIRY_ID")
		.ok_or(ApiError::Validation("Enquiry id is required".to_string()))?;

	print!("Delete enquiry {}? [y/N] ", id);
	io::stdout().flush()?;
	let mut answer = String::new();
	io::stdin().read_line(&mut answer)?;

	match confirm_deletion(&answer) {
		Some(confirmed) => {
			Enquiry::delete(api, &id, confirmed).await?;
			println!("Enquiry {} deleted", id);
		}
		None => println!("Cancelled"),
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn argv(items: &[&str]) -> Vec<String> {
		items.iter().map(|item| item.to_string()).collect()
	}

	#[test]
	fn command_from_argv_is_not_positional() {
		let argv = argv(&["lab-catalog", "product", "p1"]);
		let (command, args) = split_command(&argv, None);
		assert_eq!(command, "product");
		assert_eq!(args, ["p1".to_string()]);
		assert_eq!(arg_or_env(args, 0, "LAB_CATALOG_UNSET_ID").as_deref(), Some("p1"));
	}

	#[test]
	fn command_from_env_keeps_every_argument() {
		let argv = argv(&["lab-catalog", "admin@lab.org", "secret"]);
		let (command, args) = split_command(&argv, Some("login".to_string()));
		assert_eq!(command, "login");
		assert_eq!(arg_or_env(args, 0, "LAB_CATALOG_UNSET_EMAIL").as_deref(), Some("admin@lab.org"));
		assert_eq!(arg_or_env(args, 1, "LAB_CATALOG_UNSET_PASSWORD").as_deref(), Some("secret"));
	}

	#[test]
	fn no_command_at_all() {
		let argv = argv(&["lab-catalog"]);
		let (command, args) = split_command(&argv, None);
		assert_eq!(command, "");
		assert!(args.is_empty());
	}
}

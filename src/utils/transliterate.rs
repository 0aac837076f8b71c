use translit::{CharsMapping, Transliterator};

pub struct Translit {}

impl Translit {
	/// Latin transliteration of a name, lowercased.
	pub fn convert(name: Option<String>) -> String {
		let table: CharsMapping = [
			("ä", "ae"),
			("ö", "oe"),
			("ü", "ue"),
			("ß", "ss"),
			("à", "a"),
			("á", "a"),
			("â", "a"),
			("ç", "c"),
			("è", "e"),
			("é", "e"),
			("ê", "e"),
			("ë", "e"),
			("í", "i"),
			("ï", "i"),
			("ñ", "n"),
			("ó", "o"),
			("ô", "o"),
			("ú", "u"),
			("µ", "u"),
			("°", ""),
			("а", "a"),
			("б", "b"),
			("в", "v"),
			("г", "g"),
			("д", "d"),
			("е", "e"),
			("ё", "e"),
			("ж", "j"),
			("з", "z"),
			("и", "i"),
			("к", "k"),
			("л", "l"),
			("м", "m"),
			("н", "n"),
			("о", "o"),
			("п", "p"),
			("р", "r"),
			("с", "s"),
			("т", "t"),
			("у", "u"),
			("ф", "f"),
			("х", "h"),
			("ц", "c"),
			("ч", "ch"),
			("ш", "sh"),
			("щ", "shch"),
			("ы", "y"),
			("э", "e"),
			("ю", "u"),
			("я", "ya"),
			("й", "i"),
			("ъ", ""),
			("ь", ""),
		]
		.iter()
		.cloned()
		.collect();

		let trasliterator = Transliterator::new(table);
		trasliterator.convert(&name.unwrap_or("".to_string()).to_lowercase(), false)
	}

	/// URL-safe key: ascii alphanumerics separated by single dashes.
	pub fn slug(name: &str) -> String {
		let latin = Translit::convert(Some(name.trim().to_string()));
		let mut slug = String::with_capacity(latin.len());

		for ch in latin.chars() {
			if ch.is_ascii_alphanumeric() {
				slug.push(ch);
			} else if !slug.is_empty() && !slug.ends_with('-') {
				slug.push('-');
			}
		}

		slug.trim_end_matches('-').to_string()
	}
}

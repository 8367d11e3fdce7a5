//! English singular/plural inflection for resource names.
//!
//! Only the trailing `_`-separated segment is inflected (`field_type` → `field_types`), and all
//! input is expected in lowercase. [`pluralize`] and [`singularize`] round-trip for every word
//! they produce, which is what descriptor normalization relies on.

const UNCOUNTABLE: &[&str] = &[
	"data",
	"equipment",
	"feedback",
	"information",
	"metadata",
	"news",
	"series",
	"species",
];
// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
	("alias", "aliases"),
	("analysis", "analyses"),
	("child", "children"),
	("criterion", "criteria"),
	("half", "halves"),
	("knife", "knives"),
	("leaf", "leaves"),
	("life", "lives"),
	("man", "men"),
	("person", "people"),
	("shoe", "shoes"),
	("status", "statuses"),
	("wife", "wives"),
	("woman", "women"),
];

/// Returns the plural form of `word`.
pub fn pluralize(word: &str) -> String {
	let (prefix, tail) = split_tail(word);

	format!("{prefix}{}", pluralize_segment(tail))
}

/// Returns the singular form of `word`. Already-singular input is returned unchanged.
pub fn singularize(word: &str) -> String {
	let (prefix, tail) = split_tail(word);

	format!("{prefix}{}", singularize_segment(tail))
}

fn split_tail(word: &str) -> (&str, &str) {
	match word.rfind('_') {
		Some(idx) => word.split_at(idx + 1),
		None => ("", word),
	}
}

fn pluralize_segment(word: &str) -> String {
	if word.is_empty() || UNCOUNTABLE.contains(&word) {
		return word.to_owned();
	}
	if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
		return (*plural).to_owned();
	}
	if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
		return word.to_owned();
	}
	if ["s", "sh", "ch", "x", "zz"].iter().any(|suffix| word.ends_with(suffix)) {
		return format!("{word}es");
	}
	if word.ends_with('z') {
		return format!("{word}zes");
	}
	if let Some(stem) = word.strip_suffix('y')
		&& ends_with_consonant(stem)
	{
		return format!("{stem}ies");
	}
	if let Some(stem) = word.strip_suffix('o')
		&& ends_with_consonant(stem)
	{
		return format!("{word}es");
	}

	format!("{word}s")
}

fn singularize_segment(word: &str) -> String {
	if word.is_empty() || UNCOUNTABLE.contains(&word) {
		return word.to_owned();
	}
	if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
		return (*singular).to_owned();
	}
	if IRREGULAR.iter().any(|(singular, _)| *singular == word) {
		return word.to_owned();
	}
	if let Some(stem) = word.strip_suffix("ies")
		&& ends_with_consonant(stem)
	{
		return format!("{stem}y");
	}
	if let Some(stem) = word.strip_suffix("zzes") {
		return if stem.ends_with('z') { format!("{stem}zz") } else { format!("{stem}z") };
	}
	if let Some(stem) = word.strip_suffix("es")
		&& ["ss", "sh", "ch", "x"].iter().any(|suffix| stem.ends_with(suffix))
	{
		return stem.to_owned();
	}
	if let Some(stem) = word.strip_suffix("oes")
		&& ends_with_consonant(stem)
	{
		return format!("{stem}o");
	}
	if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
		return word.to_owned();
	}
	if let Some(stem) = word.strip_suffix('s') {
		return stem.to_owned();
	}

	word.to_owned()
}

fn ends_with_consonant(stem: &str) -> bool {
	stem.chars().last().is_some_and(|c| c.is_ascii_alphabetic() && !"aeiou".contains(c))
}

//! Static canonicalization tables for the categorical dimensions.
//!
//! The source API spells province and sex labels with inconsistent casing
//! and word order; these maps pin every known spelling to one display form.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::model::Sex;

/// Province canonical names (fixes for UPPERCASED and accent variants).
static PROVINCE_FIXES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("albacete", "Albacete"),
        ("alicante/alacant", "Alicante/Alacant"),
        ("almería", "Almería"),
        ("araba/álava", "Araba/Álava"),
        ("asturias", "Asturias"),
        ("badajoz", "Badajoz"),
        ("balears, illes", "Balears, Illes"),
        ("barcelona", "Barcelona"),
        ("bizkaia", "Bizkaia"),
        ("burgos", "Burgos"),
        ("cantabria", "Cantabria"),
        ("castellón/castelló", "Castellón/Castelló"),
        ("ceuta", "Ceuta"),
        ("ciudad real", "Ciudad Real"),
        ("coruña, a", "Coruña, A"),
        ("cuenca", "Cuenca"),
        ("cáceres", "Cáceres"),
        ("cádiz", "Cádiz"),
        ("córdoba", "Córdoba"),
        ("gipuzkoa", "Gipuzkoa"),
        ("girona", "Girona"),
        ("granada", "Granada"),
        ("guadalajara", "Guadalajara"),
        ("huelva", "Huelva"),
        ("huesca", "Huesca"),
        ("jaén", "Jaén"),
        ("león", "León"),
        ("lleida", "Lleida"),
        ("lugo", "Lugo"),
        ("madrid", "Madrid"),
        ("melilla", "Melilla"),
        ("murcia", "Murcia"),
        ("málaga", "Málaga"),
        ("navarra", "Navarra"),
        ("ourense", "Ourense"),
        ("palencia", "Palencia"),
        ("palmas, las", "Palmas, Las"),
        ("pontevedra", "Pontevedra"),
        ("rioja, la", "Rioja, La"),
        ("salamanca", "Salamanca"),
        ("santa cruz de tenerife", "Santa Cruz de Tenerife"),
        ("segovia", "Segovia"),
        ("sevilla", "Sevilla"),
        ("soria", "Soria"),
        ("tarragona", "Tarragona"),
        ("teruel", "Teruel"),
        ("toledo", "Toledo"),
        ("total nacional", "Total Nacional"),
        ("valencia/valència", "Valencia/València"),
        ("valladolid", "Valladolid"),
        ("zamora", "Zamora"),
        ("zaragoza", "Zaragoza"),
        ("ávila", "Ávila"),
    ])
});

/// Canonical display form for a province label. Unmapped input is
/// title-cased verbatim (best effort, not an error).
pub fn canon_province(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    match PROVINCE_FIXES.get(key.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => title_case(raw.trim()),
    }
}

/// Canonical sex for a label, if the label belongs to the closed set.
pub fn canon_sex(raw: &str) -> Option<Sex> {
    match raw.trim().to_lowercase().as_str() {
        "ambos sexos" => Some(Sex::AmbosSexos),
        "hombres" => Some(Sex::Hombres),
        "mujeres" => Some(Sex::Mujeres),
        _ => None,
    }
}

/// Word-initial capitalization with non-alphabetic boundaries, so
/// "alicante/alacant" becomes "Alicante/Alacant".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alphabetic = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(c);
            prev_alphabetic = false;
        }
    }
    out
}

//! Country name to ISO 3166-1 alpha-3 lookup.
//!
//! Lookup is case, accent and punctuation insensitive, so "Côte d'Ivoire",
//! "cote d ivoire" and "COTE D'IVOIRE" all resolve to `CIV`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::normalize::transliterate;

/// `(alpha-3, names and aliases)`. The first name is the short English name.
const COUNTRIES: &[(&str, &[&str])] = &[
    ("AFG", &["Afghanistan"]),
    ("ALB", &["Albania"]),
    ("DZA", &["Algeria", "Argelia", "Algérie"]),
    ("AND", &["Andorra"]),
    ("AGO", &["Angola"]),
    ("ATG", &["Antigua and Barbuda"]),
    ("ARG", &["Argentina", "Argentine"]),
    ("ARM", &["Armenia", "Arménie"]),
    ("AUS", &["Australia", "Australie"]),
    ("AUT", &["Austria", "Autriche"]),
    ("AZE", &["Azerbaijan", "Azerbaiyán"]),
    ("BHS", &["Bahamas", "The Bahamas"]),
    ("BHR", &["Bahrain", "Bahréin"]),
    ("BGD", &["Bangladesh"]),
    ("BRB", &["Barbados"]),
    ("BLR", &["Belarus", "Bielorrusia"]),
    ("BEL", &["Belgium", "Bélgica", "Belgique"]),
    ("BLZ", &["Belize", "Belice"]),
    ("BEN", &["Benin", "Benín", "Bénin"]),
    ("BTN", &["Bhutan", "Bután"]),
    ("BOL", &["Bolivia", "Plurinational State of Bolivia", "Estado Plurinacional de Bolivia", "Bolivie"]),
    ("BIH", &["Bosnia and Herzegovina", "Bosnia y Herzegovina"]),
    ("BWA", &["Botswana"]),
    ("BRA", &["Brazil", "Brasil", "Brésil"]),
    ("BRN", &["Brunei", "Brunei Darussalam"]),
    ("BGR", &["Bulgaria", "Bulgarie"]),
    ("BFA", &["Burkina Faso"]),
    ("BDI", &["Burundi"]),
    ("CPV", &["Cabo Verde", "Cape Verde"]),
    ("KHM", &["Cambodia", "Camboya", "Cambodge"]),
    ("CMR", &["Cameroon", "Camerún", "Cameroun"]),
    ("CAN", &["Canada", "Canadá"]),
    ("CAF", &["Central African Republic", "República Centroafricana"]),
    ("TCD", &["Chad", "Tchad"]),
    ("CHL", &["Chile", "Chili"]),
    ("CHN", &["China", "Chine", "People's Republic of China"]),
    ("COL", &["Colombia", "Colombie"]),
    ("COM", &["Comoros", "Comoras"]),
    ("COG", &["Congo", "Republic of the Congo"]),
    ("COD", &["Democratic Republic of the Congo", "DR Congo", "DRC", "República Democrática del Congo"]),
    ("CRI", &["Costa Rica"]),
    ("CIV", &["Côte d'Ivoire", "Ivory Coast", "Costa de Marfil"]),
    ("HRV", &["Croatia", "Croacia", "Croatie"]),
    ("CUB", &["Cuba"]),
    ("CYP", &["Cyprus", "Chipre", "Chypre"]),
    ("CZE", &["Czechia", "Czech Republic", "República Checa", "Chequia"]),
    ("DNK", &["Denmark", "Dinamarca", "Danemark"]),
    ("DJI", &["Djibouti", "Yibuti"]),
    ("DMA", &["Dominica"]),
    ("DOM", &["Dominican Republic", "República Dominicana"]),
    ("ECU", &["Ecuador", "Équateur"]),
    ("EGY", &["Egypt", "Egipto", "Égypte"]),
    ("SLV", &["El Salvador"]),
    ("GNQ", &["Equatorial Guinea", "Guinea Ecuatorial"]),
    ("ERI", &["Eritrea"]),
    ("EST", &["Estonia", "Estonie"]),
    ("SWZ", &["Eswatini", "Swaziland"]),
    ("ETH", &["Ethiopia", "Etiopía", "Éthiopie"]),
    ("FJI", &["Fiji"]),
    ("FIN", &["Finland", "Finlandia", "Finlande"]),
    ("FRA", &["France", "Francia"]),
    ("GAB", &["Gabon", "Gabón"]),
    ("GMB", &["Gambia", "The Gambia"]),
    ("GEO", &["Georgia", "Géorgie"]),
    ("DEU", &["Germany", "Alemania", "Allemagne"]),
    ("GHA", &["Ghana"]),
    ("GRC", &["Greece", "Grecia", "Grèce"]),
    ("GRD", &["Grenada"]),
    ("GTM", &["Guatemala"]),
    ("GIN", &["Guinea", "Guinée"]),
    ("GNB", &["Guinea-Bissau"]),
    ("GUY", &["Guyana"]),
    ("HTI", &["Haiti", "Haití", "Haïti"]),
    ("HND", &["Honduras"]),
    ("HUN", &["Hungary", "Hungría", "Hongrie"]),
    ("ISL", &["Iceland", "Islandia", "Islande"]),
    ("IND", &["India", "Inde"]),
    ("IDN", &["Indonesia", "Indonésie"]),
    ("IRN", &["Iran", "Islamic Republic of Iran", "Irán"]),
    ("IRQ", &["Iraq", "Irak"]),
    ("IRL", &["Ireland", "Irlanda", "Irlande"]),
    ("ISR", &["Israel", "Israël"]),
    ("ITA", &["Italy", "Italia", "Italie"]),
    ("JAM", &["Jamaica", "Jamaïque"]),
    ("JPN", &["Japan", "Japón", "Japon"]),
    ("JOR", &["Jordan", "Jordania", "Jordanie"]),
    ("KAZ", &["Kazakhstan", "Kazajistán"]),
    ("KEN", &["Kenya", "Kenia"]),
    ("KIR", &["Kiribati"]),
    ("PRK", &["North Korea", "Democratic People's Republic of Korea", "Corea del Norte"]),
    ("KOR", &["South Korea", "Republic of Korea", "Korea", "Corea del Sur"]),
    ("KWT", &["Kuwait", "Koweït"]),
    ("KGZ", &["Kyrgyzstan", "Kirguistán"]),
    ("LAO", &["Laos", "Lao People's Democratic Republic"]),
    ("LVA", &["Latvia", "Letonia", "Lettonie"]),
    ("LBN", &["Lebanon", "Líbano", "Liban"]),
    ("LSO", &["Lesotho"]),
    ("LBR", &["Liberia"]),
    ("LBY", &["Libya", "Libia", "Libye"]),
    ("LIE", &["Liechtenstein"]),
    ("LTU", &["Lithuania", "Lituania", "Lituanie"]),
    ("LUX", &["Luxembourg", "Luxemburgo"]),
    ("MDG", &["Madagascar"]),
    ("MWI", &["Malawi"]),
    ("MYS", &["Malaysia", "Malasia", "Malaisie"]),
    ("MDV", &["Maldives", "Maldivas"]),
    ("MLI", &["Mali", "Malí"]),
    ("MLT", &["Malta", "Malte"]),
    ("MHL", &["Marshall Islands", "Islas Marshall"]),
    ("MRT", &["Mauritania", "Mauritanie"]),
    ("MUS", &["Mauritius", "Mauricio", "Maurice"]),
    ("MEX", &["Mexico", "México", "Mexique"]),
    ("FSM", &["Micronesia", "Federated States of Micronesia"]),
    ("MDA", &["Moldova", "Republic of Moldova", "Moldavia"]),
    ("MCO", &["Monaco", "Mónaco"]),
    ("MNG", &["Mongolia", "Mongolie"]),
    ("MNE", &["Montenegro", "Monténégro"]),
    ("MAR", &["Morocco", "Marruecos", "Maroc"]),
    ("MOZ", &["Mozambique"]),
    ("MMR", &["Myanmar", "Burma"]),
    ("NAM", &["Namibia", "Namibie"]),
    ("NRU", &["Nauru"]),
    ("NPL", &["Nepal", "Népal"]),
    ("NLD", &["Netherlands", "The Netherlands", "Holland", "Países Bajos", "Pays-Bas"]),
    ("NZL", &["New Zealand", "Nueva Zelanda", "Nouvelle-Zélande"]),
    ("NIC", &["Nicaragua"]),
    ("NER", &["Niger", "Níger"]),
    ("NGA", &["Nigeria", "Nigéria"]),
    ("MKD", &["North Macedonia", "Macedonia", "Macedonia del Norte"]),
    ("NOR", &["Norway", "Noruega", "Norvège"]),
    ("OMN", &["Oman", "Omán"]),
    ("PAK", &["Pakistan", "Pakistán"]),
    ("PLW", &["Palau"]),
    ("PSE", &["Palestine", "State of Palestine", "Palestina"]),
    ("PAN", &["Panama", "Panamá"]),
    ("PNG", &["Papua New Guinea", "Papúa Nueva Guinea"]),
    ("PRY", &["Paraguay"]),
    ("PER", &["Peru", "Perú", "Pérou"]),
    ("PHL", &["Philippines", "Filipinas"]),
    ("POL", &["Poland", "Polonia", "Pologne"]),
    ("PRT", &["Portugal"]),
    ("QAT", &["Qatar"]),
    ("ROU", &["Romania", "Rumania", "Rumanía", "Roumanie"]),
    ("RUS", &["Russia", "Russian Federation", "Rusia", "Federación de Rusia", "Russie"]),
    ("RWA", &["Rwanda", "Ruanda"]),
    ("KNA", &["Saint Kitts and Nevis"]),
    ("LCA", &["Saint Lucia", "Santa Lucía"]),
    ("VCT", &["Saint Vincent and the Grenadines"]),
    ("WSM", &["Samoa"]),
    ("SMR", &["San Marino"]),
    ("STP", &["Sao Tome and Principe", "São Tomé and Príncipe"]),
    ("SAU", &["Saudi Arabia", "Arabia Saudita", "Arabie saoudite"]),
    ("SEN", &["Senegal", "Sénégal"]),
    ("SRB", &["Serbia", "Serbie"]),
    ("SYC", &["Seychelles"]),
    ("SLE", &["Sierra Leone", "Sierra Leona"]),
    ("SGP", &["Singapore", "Singapur", "Singapour"]),
    ("SVK", &["Slovakia", "Eslovaquia", "Slovaquie"]),
    ("SVN", &["Slovenia", "Eslovenia", "Slovénie"]),
    ("SLB", &["Solomon Islands", "Islas Salomón"]),
    ("SOM", &["Somalia", "Somalie"]),
    ("ZAF", &["South Africa", "Sudáfrica", "Afrique du Sud"]),
    ("SSD", &["South Sudan", "Sudán del Sur"]),
    ("ESP", &["Spain", "España", "Espagne"]),
    ("LKA", &["Sri Lanka"]),
    ("SDN", &["Sudan", "Sudán", "Soudan"]),
    ("SUR", &["Suriname", "Surinam"]),
    ("SWE", &["Sweden", "Suecia", "Suède"]),
    ("CHE", &["Switzerland", "Suiza", "Suisse"]),
    ("SYR", &["Syria", "Syrian Arab Republic", "Siria", "Syrie"]),
    ("TWN", &["Taiwan"]),
    ("TJK", &["Tajikistan", "Tayikistán"]),
    ("TZA", &["Tanzania", "United Republic of Tanzania"]),
    ("THA", &["Thailand", "Tailandia", "Thaïlande"]),
    ("TLS", &["Timor-Leste", "East Timor"]),
    ("TGO", &["Togo"]),
    ("TON", &["Tonga"]),
    ("TTO", &["Trinidad and Tobago", "Trinidad y Tobago"]),
    ("TUN", &["Tunisia", "Túnez", "Tunisie"]),
    ("TUR", &["Türkiye", "Turkey", "Turquía", "Turquie"]),
    ("TKM", &["Turkmenistan", "Turkmenistán"]),
    ("TUV", &["Tuvalu"]),
    ("UGA", &["Uganda", "Ouganda"]),
    ("UKR", &["Ukraine", "Ucrania"]),
    ("ARE", &["United Arab Emirates", "UAE", "Emiratos Árabes Unidos"]),
    ("GBR", &["United Kingdom", "UK", "Great Britain", "Britain", "Reino Unido", "Royaume-Uni"]),
    ("USA", &["United States", "United States of America", "USA", "US", "U.S.", "U.S.A.", "America", "Estados Unidos", "EE.UU.", "États-Unis"]),
    ("URY", &["Uruguay"]),
    ("UZB", &["Uzbekistan", "Uzbekistán"]),
    ("VUT", &["Vanuatu"]),
    ("VAT", &["Holy See", "Vatican City", "Vatican", "Santa Sede"]),
    ("VEN", &["Venezuela", "Bolivarian Republic of Venezuela"]),
    ("VNM", &["Viet Nam", "Vietnam"]),
    ("YEM", &["Yemen", "Yémen"]),
    ("ZMB", &["Zambia", "Zambie"]),
    ("ZWE", &["Zimbabwe", "Zimbabue"]),
];

static COUNTRY_INDEX: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (iso3, names) in COUNTRIES {
        index.insert(lookup_key(iso3), *iso3);
        for name in names.iter() {
            index.entry(lookup_key(name)).or_insert(*iso3);
        }
    }
    index
});

/// Fold a name into its lookup form: ASCII, lowercase, letters and digits
/// only, single spaces, no leading article.
fn lookup_key(name: &str) -> String {
    let folded: String = transliterate(name)
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            '.' => None,
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => Some(' '),
        })
        .collect();
    let key = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    match key.strip_prefix("the ") {
        Some(rest) => rest.to_string(),
        None => key,
    }
}

/// Resolve a country name, alias or alpha-3 code to its alpha-3 code.
///
/// ```rust
/// use lexner::country::iso3_code;
///
/// assert_eq!(iso3_code("España"), Some("ESP"));
/// assert_eq!(iso3_code("the Netherlands"), Some("NLD"));
/// assert_eq!(iso3_code("Gotham"), None);
/// ```
#[must_use]
pub fn iso3_code(name: &str) -> Option<&'static str> {
    let key = lookup_key(name);
    if key.is_empty() {
        return None;
    }
    COUNTRY_INDEX.get(&key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_and_case_insensitive() {
        assert_eq!(iso3_code("Côte d'Ivoire"), Some("CIV"));
        assert_eq!(iso3_code("COTE D IVOIRE"), Some("CIV"));
        assert_eq!(iso3_code("méxico"), Some("MEX"));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(iso3_code("USA"), Some("USA"));
        assert_eq!(iso3_code("U.S.A."), Some("USA"));
        assert_eq!(iso3_code("UK"), Some("GBR"));
        assert_eq!(iso3_code("Estados Unidos"), Some("USA"));
    }

    #[test]
    fn test_codes_resolve_to_themselves() {
        for (iso3, _) in COUNTRIES {
            assert_eq!(iso3_code(iso3), Some(*iso3), "{iso3}");
        }
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(iso3_code("Springfield"), None);
        assert_eq!(iso3_code(""), None);
        assert_eq!(iso3_code("  ...  "), None);
    }
}

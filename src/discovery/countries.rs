/*
 * mirrorselect - Fastest archive mirror selection for Ubuntu.
 * Copyright (C) 2025  mirrorselect contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Country display names as they appear in mirror listings, mapped to
//! ISO 3166-1 alpha-2 codes.

#[rustfmt::skip]
const COUNTRIES: &[(&str, &str)] = &[
    ("afghanistan", "AF"), ("aland islands", "AX"), ("albania", "AL"), ("algeria", "DZ"),
    ("american samoa", "AS"), ("andorra", "AD"), ("angola", "AO"), ("anguilla", "AI"),
    ("antarctica", "AQ"), ("antigua and barbuda", "AG"), ("argentina", "AR"), ("armenia", "AM"),
    ("aruba", "AW"), ("australia", "AU"), ("austria", "AT"), ("azerbaijan", "AZ"),
    ("bahamas", "BS"), ("bahrain", "BH"), ("bangladesh", "BD"), ("barbados", "BB"),
    ("belarus", "BY"), ("belgium", "BE"), ("belize", "BZ"), ("benin", "BJ"),
    ("bermuda", "BM"), ("bhutan", "BT"), ("bolivia", "BO"),
    ("bolivia, plurinational state of", "BO"), ("bosnia and herzegovina", "BA"),
    ("botswana", "BW"), ("brazil", "BR"), ("brunei darussalam", "BN"), ("brunei", "BN"),
    ("bulgaria", "BG"), ("burkina faso", "BF"), ("burundi", "BI"), ("cambodia", "KH"),
    ("cameroon", "CM"), ("canada", "CA"), ("cape verde", "CV"), ("cabo verde", "CV"),
    ("cayman islands", "KY"), ("central african republic", "CF"), ("chad", "TD"),
    ("chile", "CL"), ("china", "CN"), ("colombia", "CO"), ("comoros", "KM"),
    ("congo", "CG"), ("congo, the democratic republic of the", "CD"),
    ("democratic republic of the congo", "CD"), ("costa rica", "CR"),
    ("cote d'ivoire", "CI"), ("côte d'ivoire", "CI"), ("ivory coast", "CI"),
    ("croatia", "HR"), ("cuba", "CU"), ("curacao", "CW"), ("curaçao", "CW"),
    ("cyprus", "CY"), ("czech republic", "CZ"), ("czechia", "CZ"), ("denmark", "DK"),
    ("djibouti", "DJ"), ("dominica", "DM"), ("dominican republic", "DO"), ("ecuador", "EC"),
    ("egypt", "EG"), ("el salvador", "SV"), ("equatorial guinea", "GQ"), ("eritrea", "ER"),
    ("estonia", "EE"), ("eswatini", "SZ"), ("swaziland", "SZ"), ("ethiopia", "ET"),
    ("faroe islands", "FO"), ("fiji", "FJ"), ("finland", "FI"), ("france", "FR"),
    ("french guiana", "GF"), ("french polynesia", "PF"), ("gabon", "GA"), ("gambia", "GM"),
    ("georgia", "GE"), ("germany", "DE"), ("ghana", "GH"), ("gibraltar", "GI"),
    ("greece", "GR"), ("greenland", "GL"), ("grenada", "GD"), ("guadeloupe", "GP"),
    ("guam", "GU"), ("guatemala", "GT"), ("guernsey", "GG"), ("guinea", "GN"),
    ("guinea-bissau", "GW"), ("guyana", "GY"), ("haiti", "HT"), ("honduras", "HN"),
    ("hong kong", "HK"), ("hungary", "HU"), ("iceland", "IS"), ("india", "IN"),
    ("indonesia", "ID"), ("iran", "IR"), ("iran, islamic republic of", "IR"), ("iraq", "IQ"),
    ("ireland", "IE"), ("isle of man", "IM"), ("israel", "IL"), ("italy", "IT"),
    ("jamaica", "JM"), ("japan", "JP"), ("jersey", "JE"), ("jordan", "JO"),
    ("kazakhstan", "KZ"), ("kenya", "KE"), ("kiribati", "KI"),
    ("korea, democratic people's republic of", "KP"), ("north korea", "KP"),
    ("korea, republic of", "KR"), ("south korea", "KR"), ("korea", "KR"),
    ("kosovo", "XK"), ("kuwait", "KW"), ("kyrgyzstan", "KG"),
    ("lao people's democratic republic", "LA"), ("laos", "LA"), ("latvia", "LV"),
    ("lebanon", "LB"), ("lesotho", "LS"), ("liberia", "LR"), ("libya", "LY"),
    ("liechtenstein", "LI"), ("lithuania", "LT"), ("luxembourg", "LU"), ("macao", "MO"),
    ("macau", "MO"), ("macedonia", "MK"), ("north macedonia", "MK"),
    ("macedonia, the former yugoslav republic of", "MK"), ("madagascar", "MG"),
    ("malawi", "MW"), ("malaysia", "MY"), ("maldives", "MV"), ("mali", "ML"),
    ("malta", "MT"), ("marshall islands", "MH"), ("martinique", "MQ"), ("mauritania", "MR"),
    ("mauritius", "MU"), ("mayotte", "YT"), ("mexico", "MX"),
    ("micronesia, federated states of", "FM"), ("moldova", "MD"),
    ("moldova, republic of", "MD"), ("monaco", "MC"), ("mongolia", "MN"),
    ("montenegro", "ME"), ("montserrat", "MS"), ("morocco", "MA"), ("mozambique", "MZ"),
    ("myanmar", "MM"), ("namibia", "NA"), ("nauru", "NR"), ("nepal", "NP"),
    ("netherlands", "NL"), ("new caledonia", "NC"), ("new zealand", "NZ"),
    ("nicaragua", "NI"), ("niger", "NE"), ("nigeria", "NG"), ("norway", "NO"),
    ("oman", "OM"), ("pakistan", "PK"), ("palau", "PW"), ("palestine", "PS"),
    ("palestine, state of", "PS"), ("panama", "PA"), ("papua new guinea", "PG"),
    ("paraguay", "PY"), ("peru", "PE"), ("philippines", "PH"), ("poland", "PL"),
    ("portugal", "PT"), ("puerto rico", "PR"), ("qatar", "QA"), ("reunion", "RE"),
    ("réunion", "RE"), ("romania", "RO"), ("russia", "RU"), ("russian federation", "RU"),
    ("rwanda", "RW"), ("saint kitts and nevis", "KN"), ("saint lucia", "LC"),
    ("saint vincent and the grenadines", "VC"), ("samoa", "WS"), ("san marino", "SM"),
    ("sao tome and principe", "ST"), ("saudi arabia", "SA"), ("senegal", "SN"),
    ("serbia", "RS"), ("seychelles", "SC"), ("sierra leone", "SL"), ("singapore", "SG"),
    ("slovakia", "SK"), ("slovenia", "SI"), ("solomon islands", "SB"), ("somalia", "SO"),
    ("south africa", "ZA"), ("south sudan", "SS"), ("spain", "ES"), ("sri lanka", "LK"),
    ("sudan", "SD"), ("suriname", "SR"), ("sweden", "SE"), ("switzerland", "CH"),
    ("syria", "SY"), ("syrian arab republic", "SY"), ("taiwan", "TW"),
    ("taiwan, province of china", "TW"), ("tajikistan", "TJ"), ("tanzania", "TZ"),
    ("tanzania, united republic of", "TZ"), ("thailand", "TH"), ("timor-leste", "TL"),
    ("togo", "TG"), ("tonga", "TO"), ("trinidad and tobago", "TT"), ("tunisia", "TN"),
    ("turkey", "TR"), ("türkiye", "TR"), ("turkiye", "TR"), ("turkmenistan", "TM"),
    ("uganda", "UG"), ("ukraine", "UA"), ("united arab emirates", "AE"),
    ("united kingdom", "GB"), ("united states", "US"), ("united states of america", "US"),
    ("uruguay", "UY"), ("uzbekistan", "UZ"), ("vanuatu", "VU"), ("venezuela", "VE"),
    ("venezuela, bolivarian republic of", "VE"), ("viet nam", "VN"), ("vietnam", "VN"),
    ("virgin islands, british", "VG"), ("virgin islands, u.s.", "VI"), ("yemen", "YE"),
    ("zambia", "ZM"), ("zimbabwe", "ZW"),
];

/// Resolve a country name, ignoring case and surrounding whitespace
pub fn alpha2(name: &str) -> Option<&'static str> {
    let needle = name.trim().to_lowercase();
    COUNTRIES
        .iter()
        .find(|(known, _)| *known == needle)
        .map(|(_, code)| *code)
}

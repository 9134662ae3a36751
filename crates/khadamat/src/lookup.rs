//! Compiled-in reference tables. Ids are stable and shared with the API.

use crate::i18n::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupEntry {
    pub id: &'static str,
    pub name_en: &'static str,
    pub name_ar: &'static str,
}

impl LookupEntry {
    pub fn name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.name_en,
            Locale::Ar => self.name_ar,
        }
    }
}

const fn entry(id: &'static str, name_en: &'static str, name_ar: &'static str) -> LookupEntry {
    LookupEntry {
        id,
        name_en,
        name_ar,
    }
}

pub static NATIONALITIES: &[LookupEntry] = &[
    entry("PH", "Philippines", "الفلبين"),
    entry("ID", "Indonesia", "إندونيسيا"),
    entry("IN", "India", "الهند"),
    entry("LK", "Sri Lanka", "سريلانكا"),
    entry("NP", "Nepal", "نيبال"),
    entry("BD", "Bangladesh", "بنغلاديش"),
    entry("PK", "Pakistan", "باكستان"),
    entry("ET", "Ethiopia", "إثيوبيا"),
    entry("KE", "Kenya", "كينيا"),
    entry("UG", "Uganda", "أوغندا"),
    entry("GH", "Ghana", "غانا"),
    entry("MM", "Myanmar", "ميانمار"),
    entry("VN", "Vietnam", "فيتنام"),
];

pub static EMIRATES: &[LookupEntry] = &[
    entry("AUH", "Abu Dhabi", "أبوظبي"),
    entry("DXB", "Dubai", "دبي"),
    entry("SHJ", "Sharjah", "الشارقة"),
    entry("AJM", "Ajman", "عجمان"),
    entry("UAQ", "Umm Al Quwain", "أم القيوين"),
    entry("RAK", "Ras Al Khaimah", "رأس الخيمة"),
    entry("FUJ", "Fujairah", "الفجيرة"),
];

pub static LANGUAGES: &[LookupEntry] = &[
    entry("ar", "Arabic", "العربية"),
    entry("en", "English", "الإنجليزية"),
    entry("tl", "Tagalog", "التاغالوغية"),
    entry("hi", "Hindi", "الهندية"),
    entry("ur", "Urdu", "الأردية"),
    entry("id", "Indonesian", "الإندونيسية"),
    entry("am", "Amharic", "الأمهرية"),
    entry("sw", "Swahili", "السواحيلية"),
    entry("si", "Sinhala", "السنهالية"),
    entry("ne", "Nepali", "النيبالية"),
    entry("bn", "Bengali", "البنغالية"),
];

pub static SKILLS: &[LookupEntry] = &[
    entry("cleaning", "Cleaning", "التنظيف"),
    entry("cooking", "Cooking", "الطبخ"),
    entry("arabic_cooking", "Arabic cooking", "الطبخ العربي"),
    entry("childcare", "Childcare", "رعاية الأطفال"),
    entry("newborn_care", "Newborn care", "رعاية المواليد"),
    entry("elderly_care", "Elderly care", "رعاية كبار السن"),
    entry("laundry", "Laundry & ironing", "الغسيل والكي"),
    entry("pet_care", "Pet care", "رعاية الحيوانات الأليفة"),
    entry("driving", "Driving", "القيادة"),
    entry("tutoring", "Tutoring", "التدريس"),
];

/// Licensed activities a recruitment office may declare.
pub static OFFICE_SCOPES: &[LookupEntry] = &[
    entry("recruitment", "Recruitment from abroad", "الاستقدام من الخارج"),
    entry("transfer", "In-country sponsorship transfer", "نقل الكفالة داخل الدولة"),
    entry("temporary", "Temporary / hourly placement", "التشغيل المؤقت أو بالساعة"),
    entry("training", "Worker training", "تدريب العمالة"),
];

pub static RELIGIONS: &[LookupEntry] = &[
    entry("muslim", "Muslim", "مسلم"),
    entry("christian", "Christian", "مسيحي"),
    entry("hindu", "Hindu", "هندوسي"),
    entry("buddhist", "Buddhist", "بوذي"),
    entry("other", "Other", "أخرى"),
];

fn find_in(table: &'static [LookupEntry], id: &str) -> Option<&'static LookupEntry> {
    table.iter().find(|entry| entry.id.eq_ignore_ascii_case(id.trim()))
}

pub fn find_nationality(id: &str) -> Option<&'static LookupEntry> {
    find_in(NATIONALITIES, id)
}

pub fn find_emirate(id: &str) -> Option<&'static LookupEntry> {
    find_in(EMIRATES, id)
}

pub fn find_language(id: &str) -> Option<&'static LookupEntry> {
    find_in(LANGUAGES, id)
}

pub fn find_skill(id: &str) -> Option<&'static LookupEntry> {
    find_in(SKILLS, id)
}

pub fn find_office_scope(id: &str) -> Option<&'static LookupEntry> {
    find_in(OFFICE_SCOPES, id)
}

pub fn find_religion(id: &str) -> Option<&'static LookupEntry> {
    find_in(RELIGIONS, id)
}

/// Named tables, for front ends that list them generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    Nationalities,
    Emirates,
    Languages,
    Skills,
    OfficeScopes,
    Religions,
}

impl LookupTable {
    pub fn entries(self) -> &'static [LookupEntry] {
        match self {
            LookupTable::Nationalities => NATIONALITIES,
            LookupTable::Emirates => EMIRATES,
            LookupTable::Languages => LANGUAGES,
            LookupTable::Skills => SKILLS,
            LookupTable::OfficeScopes => OFFICE_SCOPES,
            LookupTable::Religions => RELIGIONS,
        }
    }
}

//! User-facing message catalogue for the two supported locales.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    /// Unknown or empty tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("ar") {
            Locale::Ar
        } else {
            Locale::En
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Ar)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    SearchFailed,
    GeocodeFailed,
    NetworkError,
    SessionExpired,
    AdminOnly,
    Saved,
    FavoriteAdded,
    FavoriteRemoved,
    FavoriteFailed,
    QuotationSent,
    PaymentConfirmed,
    Required,
}

pub fn text(locale: Locale, message: Message) -> &'static str {
    match locale {
        Locale::En => english(message),
        Locale::Ar => arabic(message),
    }
}

fn english(message: Message) -> &'static str {
    match message {
        Message::SearchFailed => "Could not search locations. Please try again.",
        Message::GeocodeFailed => "Could not determine the address for this location.",
        Message::NetworkError => "Network error. Check your connection and try again.",
        Message::SessionExpired => "Your session has expired. Please sign in again.",
        Message::AdminOnly => "Access denied. Only super admins can sign in here.",
        Message::Saved => "Saved successfully.",
        Message::FavoriteAdded => "Added to favorites.",
        Message::FavoriteRemoved => "Removed from favorites.",
        Message::FavoriteFailed => "Could not update favorites.",
        Message::QuotationSent => "Quotation request sent to the office.",
        Message::PaymentConfirmed => "Payment confirmed. Contact details unlocked.",
        Message::Required => "This field is required.",
    }
}

fn arabic(message: Message) -> &'static str {
    match message {
        Message::SearchFailed => "تعذر البحث عن المواقع. يرجى المحاولة مرة أخرى.",
        Message::GeocodeFailed => "تعذر تحديد العنوان لهذا الموقع.",
        Message::NetworkError => "خطأ في الشبكة. تحقق من اتصالك وحاول مرة أخرى.",
        Message::SessionExpired => "انتهت صلاحية الجلسة. يرجى تسجيل الدخول مرة أخرى.",
        Message::AdminOnly => "تم رفض الوصول. يسمح فقط للمشرفين الرئيسيين بتسجيل الدخول هنا.",
        Message::Saved => "تم الحفظ بنجاح.",
        Message::FavoriteAdded => "تمت الإضافة إلى المفضلة.",
        Message::FavoriteRemoved => "تمت الإزالة من المفضلة.",
        Message::FavoriteFailed => "تعذر تحديث المفضلة.",
        Message::QuotationSent => "تم إرسال طلب عرض السعر إلى المكتب.",
        Message::PaymentConfirmed => "تم تأكيد الدفع. تم فتح بيانات التواصل.",
        Message::Required => "هذا الحقل مطلوب.",
    }
}

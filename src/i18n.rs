//! UI Strings
//!
//! Arabic and English string tables for page chrome, forms and the back
//! office. Templates receive the whole table for the request locale as `t`.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::content::Locale;

/// (key, English, Arabic)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("site_name", "Maeda Foods", "مائدة للأغذية"),
    ("nav_home", "Home", "الرئيسية"),
    ("nav_brands", "Our Brands", "علاماتنا التجارية"),
    ("nav_recipes", "Recipes", "الوصفات"),
    ("nav_dishes", "Dishes", "الأطباق"),
    ("nav_contact", "Contact Us", "اتصل بنا"),
    ("nav_careers", "Careers", "الوظائف"),
    ("nav_export", "Export", "التصدير"),
    ("nav_catalog", "Download Catalog", "تحميل الكتالوج"),
    ("switch_language", "العربية", "English"),
    ("featured_products", "Featured Products", "منتجات مميزة"),
    ("latest_recipes", "Latest Recipes", "أحدث الوصفات"),
    ("brands_title", "Our Brands", "علاماتنا التجارية"),
    ("products_title", "Products", "المنتجات"),
    ("recipes_title", "Recipes", "الوصفات"),
    ("dishes_title", "Dishes", "الأطباق"),
    ("view_details", "View details", "عرض التفاصيل"),
    ("related_products", "Related Products", "منتجات ذات صلة"),
    ("recipes_with_product", "Recipes with this product", "وصفات بهذا المنتج"),
    ("ingredients", "Ingredients", "المكونات"),
    ("steps", "Preparation", "طريقة التحضير"),
    ("prep_time", "Preparation time", "وقت التحضير"),
    ("minutes", "minutes", "دقيقة"),
    ("servings", "Servings", "عدد الحصص"),
    ("weight", "Pack size", "الحجم"),
    ("brand", "Brand", "العلامة التجارية"),
    ("category", "Category", "الفئة"),
    ("dish", "Dish", "الطبق"),
    ("product_used", "Made with", "محضّرة باستخدام"),
    ("all_dishes", "All dishes", "كل الأطباق"),
    ("uncategorized", "Other", "أخرى"),
    ("no_items", "Nothing here yet.", "لا يوجد محتوى بعد."),
    ("not_found_title", "Page not found", "الصفحة غير موجودة"),
    (
        "not_found_body",
        "The page you are looking for does not exist.",
        "الصفحة التي تبحث عنها غير موجودة.",
    ),
    ("error_title", "Something went wrong", "حدث خطأ ما"),
    (
        "error_body",
        "We could not load this page. Please try again later.",
        "تعذر تحميل هذه الصفحة. يرجى المحاولة لاحقاً.",
    ),
    ("back_home", "Back to home", "العودة إلى الرئيسية"),
    ("contact_title", "Contact Us", "اتصل بنا"),
    ("careers_title", "Join Our Team", "انضم إلى فريقنا"),
    ("export_title", "Export Inquiry", "طلب تصدير"),
    ("form_name", "Name", "الاسم"),
    ("form_full_name", "Full name", "الاسم الكامل"),
    ("form_email", "Email", "البريد الإلكتروني"),
    ("form_phone", "Phone", "رقم الهاتف"),
    ("form_subject", "Subject", "الموضوع"),
    ("form_message", "Message", "الرسالة"),
    ("form_position", "Position", "الوظيفة"),
    ("form_cv", "CV (PDF or Word)", "السيرة الذاتية (PDF أو Word)"),
    ("form_company", "Company", "الشركة"),
    ("form_contact_name", "Contact person", "اسم المسؤول"),
    ("form_country", "Country", "الدولة"),
    ("form_products", "Products of interest", "المنتجات المطلوبة"),
    ("form_quantity", "Quantity", "الكمية"),
    ("form_submit", "Send", "إرسال"),
    ("form_required", "This field is required.", "هذا الحقل مطلوب."),
    ("form_invalid_email", "Enter a valid email address.", "أدخل بريداً إلكترونياً صحيحاً."),
    ("form_too_long", "This value is too long.", "القيمة طويلة جداً."),
    ("form_invalid_number", "Enter a whole number.", "أدخل رقماً صحيحاً."),
    ("form_invalid_option", "Choose one of the options.", "اختر أحد الخيارات."),
    ("form_invalid_file", "This file type is not allowed.", "نوع الملف غير مسموح."),
    ("form_invalid_media", "Upload a file or enter a link.", "ارفع ملفاً أو أدخل رابطاً."),
    ("form_file_too_large", "This file is too large.", "حجم الملف كبير جداً."),
    ("contact_sent", "Thank you, your message has been sent.", "شكراً لك، تم إرسال رسالتك."),
    ("career_sent", "Thank you, your application has been received.", "شكراً لك، تم استلام طلبك."),
    ("export_sent", "Thank you, our export team will contact you.", "شكراً لك، سيتواصل معك فريق التصدير."),
    ("submit_failed", "Sending failed. Please try again.", "فشل الإرسال. يرجى المحاولة مرة أخرى."),
    ("footer_rights", "All rights reserved.", "جميع الحقوق محفوظة."),
    ("admin_title", "Back Office", "لوحة التحكم"),
    ("admin_login", "Sign in", "تسجيل الدخول"),
    ("admin_token", "Access token", "رمز الدخول"),
    ("admin_login_failed", "Invalid access token.", "رمز الدخول غير صحيح."),
    ("admin_logout", "Sign out", "تسجيل الخروج"),
    ("admin_new", "Add new", "إضافة جديد"),
    ("admin_edit", "Edit", "تعديل"),
    ("admin_delete", "Delete", "حذف"),
    ("admin_next", "Next", "التالي"),
    ("admin_back", "Back", "السابق"),
    ("admin_submit", "Save", "حفظ"),
    ("admin_step", "Step", "الخطوة"),
    ("admin_of", "of", "من"),
    ("admin_review", "Review", "مراجعة"),
    (
        "admin_confirm",
        "I have reviewed the information above and it is correct.",
        "راجعت المعلومات أعلاه وهي صحيحة.",
    ),
    (
        "admin_confirm_required",
        "Please confirm the review before saving.",
        "يرجى تأكيد المراجعة قبل الحفظ.",
    ),
    ("admin_fix_errors", "Please correct the highlighted fields.", "يرجى تصحيح الحقول المحددة."),
    ("admin_saved", "Saved successfully.", "تم الحفظ بنجاح."),
    ("admin_deleted", "Deleted successfully.", "تم الحذف بنجاح."),
    ("admin_save_failed", "Saving failed", "فشل الحفظ"),
    ("admin_draft_expired", "This form has expired. Please start again.", "انتهت صلاحية النموذج. يرجى البدء من جديد."),
    (
        "admin_load_failed",
        "The content service is not responding. Anything you entered in the form has been kept.",
        "خدمة المحتوى لا تستجيب. تم الاحتفاظ بما أدخلته في النموذج.",
    ),
    ("admin_not_found", "This item no longer exists.", "هذا العنصر لم يعد موجوداً."),
    ("admin_try_again", "Try again", "حاول مرة أخرى"),
    ("admin_back_dashboard", "Back to dashboard", "العودة إلى لوحة التحكم"),
    ("admin_upload_failed", "The file could not be uploaded.", "تعذر رفع الملف."),
    ("error_reference", "Reference", "المرجع"),
    ("admin_catalog", "Catalog", "الكتالوج"),
    ("admin_catalog_upload", "Upload catalog (PDF)", "رفع الكتالوج (PDF)"),
    ("admin_catalog_uploaded", "Catalog uploaded.", "تم رفع الكتالوج."),
    ("admin_catalog_current", "Current catalog", "الكتالوج الحالي"),
    ("admin_none", "None", "لا يوجد"),
    ("admin_keep_current", "Leave empty to keep the current file.", "اتركه فارغاً للإبقاء على الملف الحالي."),
    ("kind_brands", "Brands", "العلامات التجارية"),
    ("kind_categories", "Categories", "الفئات"),
    ("kind_products", "Products", "المنتجات"),
    ("kind_dishes", "Dishes", "الأطباق"),
    ("kind_recipes", "Recipes", "الوصفات"),
];

fn tables() -> &'static [HashMap<&'static str, &'static str>; 2] {
    static TABLES: OnceLock<[HashMap<&'static str, &'static str>; 2]> = OnceLock::new();
    TABLES.get_or_init(|| {
        let en = MESSAGES.iter().map(|(k, en, _)| (*k, *en)).collect();
        let ar = MESSAGES.iter().map(|(k, _, ar)| (*k, *ar)).collect();
        [ar, en]
    })
}

/// The full string table for a locale
pub fn labels(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    let [ar, en] = tables();
    match locale {
        Locale::Ar => ar,
        Locale::En => en,
    }
}

/// Look up one string; unknown keys render as the key itself
pub fn t(locale: Locale, key: &str) -> &str {
    labels(locale).get(key).copied().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_key_translated() {
        for (key, en, ar) in MESSAGES {
            assert!(!en.is_empty(), "missing English for {}", key);
            assert!(!ar.is_empty(), "missing Arabic for {}", key);
        }
    }

    #[test]
    fn test_keys_unique() {
        let keys: HashSet<_> = MESSAGES.iter().map(|(k, _, _)| *k).collect();
        assert_eq!(keys.len(), MESSAGES.len());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(t(Locale::En, "nav_home"), "Home");
        assert_eq!(t(Locale::Ar, "nav_home"), "الرئيسية");
        assert_eq!(t(Locale::En, "no_such_key"), "no_such_key");
    }
}

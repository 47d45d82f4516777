/// Localized page labels for one language.
///
/// Strings are stored unescaped. The page renderer escapes them for HTML and
/// the PDF exporter maps them into the document's text encoding.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    /// Shown while the object is being fetched and translated
    pub loading: &'static str,

    /// Label in front of the category name (e.g., "Category")
    pub category_label: &'static str,

    /// Gallery placeholder when the object has no images
    pub no_images: &'static str,

    /// Heading of the language selector
    pub choose_language: &'static str,

    /// Accessible label of the navbar language button
    pub change_language: &'static str,

    /// Label of the export button
    pub export_pdf: &'static str,
}

pub const INDONESIAN_STRINGS: LanguageStrings = LanguageStrings {
    loading: "Memuat...",
    category_label: "Kategori",
    no_images: "Tidak ada gambar.",
    choose_language: "Pilih Bahasa",
    change_language: "Ganti bahasa",
    export_pdf: "Ekspor ke PDF",
};

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    loading: "Loading...",
    category_label: "Category",
    no_images: "No images available.",
    choose_language: "Choose Language",
    change_language: "Change language",
    export_pdf: "Export to PDF",
};

pub const FRENCH_STRINGS: LanguageStrings = LanguageStrings {
    loading: "Chargement...",
    category_label: "Catégorie",
    no_images: "Aucune image disponible.",
    choose_language: "Choisir la langue",
    change_language: "Changer de langue",
    export_pdf: "Exporter en PDF",
};

pub const SPANISH_STRINGS: LanguageStrings = LanguageStrings {
    loading: "Cargando...",
    category_label: "Categoría",
    no_images: "No hay imágenes disponibles.",
    choose_language: "Elegir idioma",
    change_language: "Cambiar idioma",
    export_pdf: "Exportar a PDF",
};

pub const DUTCH_STRINGS: LanguageStrings = LanguageStrings {
    loading: "Laden...",
    category_label: "Categorie",
    no_images: "Geen afbeeldingen beschikbaar.",
    choose_language: "Kies taal",
    change_language: "Taal wijzigen",
    export_pdf: "Exporteren naar PDF",
};

pub const GERMAN_STRINGS: LanguageStrings = LanguageStrings {
    loading: "Wird geladen...",
    category_label: "Kategorie",
    no_images: "Keine Bilder verfügbar.",
    choose_language: "Sprache wählen",
    change_language: "Sprache ändern",
    export_pdf: "Als PDF exportieren",
};

pub const JAPANESE_STRINGS: LanguageStrings = LanguageStrings {
    loading: "読み込み中...",
    category_label: "カテゴリー",
    no_images: "画像はありません。",
    choose_language: "言語を選択",
    change_language: "言語を変更",
    export_pdf: "PDFにエクスポート",
};

pub const KOREAN_STRINGS: LanguageStrings = LanguageStrings {
    loading: "로딩 중...",
    category_label: "카테고리",
    no_images: "사용 가능한 이미지가 없습니다.",
    choose_language: "언어 선택",
    change_language: "언어 변경",
    export_pdf: "PDF로 내보내기",
};

//! Type Classifier - 의존성 분석용 타입 이름 분류
//!
//! 멤버 타입은 문자열(`Option<Foo>`, `&Foo`, `Foo?`, `app.services.Foo`)로
//! 선언됩니다. 기본 simple name 으로 줄인 뒤 사용자 정의 타입인지 내장
//! 타입인지 분류합니다.

/// 의존성 엣지를 만들지 않는 이름
const BUILTIN_TYPE_NAMES: &[&str] = &[
    // 원시 타입
    "bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64", "int", "double", "num", "float", "long", "short", "byte",
    "boolean", "void", "dynamic", "Null",
    // 문자열 / 컨테이너
    "String", "Vec", "VecDeque", "HashMap", "HashSet", "BTreeMap", "BTreeSet", "List", "Map",
    "Set", "Iterable", "Option", "Result", "Box", "Arc", "Rc", "Cow",
    // 런타임
    "Object", "Function", "Future", "Stream", "Duration", "DateTime", "Type", "Self",
];

/// 참조/옵셔널 표시와 제네릭 인자를 제거하고 qualified 기본 이름만 남김
///
/// `&mut Option<Foo>` -> `Option`, `Foo?` -> `Foo`, `app.Foo<Bar>` -> `app.Foo`
pub fn base_type_name(raw: &str) -> Option<&str> {
    let mut name = raw.trim();
    loop {
        let stripped = name
            .trim_start_matches('&')
            .trim_start()
            .trim_start_matches("mut ")
            .trim_start_matches("dyn ")
            .trim_start_matches("impl ")
            .trim_start();
        if stripped == name {
            break;
        }
        name = stripped;
    }

    let end = name.find(['<', '[', '(', ' ']).unwrap_or(name.len());
    let name = name[..end].trim_end_matches('?').trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// (qualified 일 수 있는) 타입 이름의 마지막 경로 세그먼트
pub fn simple_name_of(raw: &str) -> Option<&str> {
    let base = base_type_name(raw)?;
    let simple = base
        .rsplit(|c| c == '.' || c == ':')
        .next()
        .unwrap_or(base);
    if simple.is_empty() {
        None
    } else {
        Some(simple)
    }
}

/// 선언된 타입 이름 중 사용자 정의 의존성을 판별하는 분류기
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    runtime_namespace: String,
}

impl TypeClassifier {
    pub fn new(runtime_namespace: impl Into<String>) -> Self {
        Self {
            runtime_namespace: runtime_namespace.into(),
        }
    }

    /// 사용자 정의 타입이면 참조 대상의 simple name
    pub fn user_defined(&self, raw: &str) -> Option<String> {
        let base = base_type_name(raw)?;
        if self.is_runtime(base) {
            return None;
        }
        let simple = simple_name_of(base)?;
        if BUILTIN_TYPE_NAMES.contains(&simple) {
            return None;
        }
        Some(simple.to_string())
    }

    pub fn is_user_defined(&self, raw: &str) -> bool {
        self.user_defined(raw).is_some()
    }

    fn is_runtime(&self, base: &str) -> bool {
        (!self.runtime_namespace.is_empty() && base.starts_with(self.runtime_namespace.as_str()))
            || base.starts_with("std::")
            || base.starts_with("core::")
    }
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::new("core.")
    }
}

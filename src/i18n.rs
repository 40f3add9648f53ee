//! Interface strings for the two supported locales.
//!
//! Lookup falls back from the active locale to Russian, and from Russian to
//! the key itself, so a missing translation degrades visibly instead of
//! panicking or returning an empty string.

use serde::{Deserialize, Serialize};

/// Interface language for assistant-authored text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ru,
    Kk,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::Kk => "kk",
        }
    }

    /// Parse a user-supplied locale code. `kz` is accepted as a common
    /// misspelling of the Kazakh code.
    pub fn from_code(code: &str) -> Option<Lang> {
        match code.trim().to_lowercase().as_str() {
            "ru" => Some(Lang::Ru),
            "kk" | "kz" => Some(Lang::Kk),
            _ => None,
        }
    }
}

/// Resolve a key for the given locale: locale table, then Russian, then the
/// key itself.
pub fn t(lang: Lang, key: &str) -> String {
    lookup(lang, key)
        .or_else(|| lookup(Lang::Ru, key))
        .unwrap_or(key)
        .to_string()
}

/// Like [`t`], with `{{name}}` placeholders substituted from `params`.
pub fn t_with(lang: Lang, key: &str, params: &[(&str, &str)]) -> String {
    let mut text = t(lang, key);
    for (name, value) in params {
        text = text.replace(&format!("{{{{{name}}}}}"), value);
    }
    text
}

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    match lang {
        Lang::Ru => ru(key),
        Lang::Kk => kk(key),
    }
}

fn ru(key: &str) -> Option<&'static str> {
    Some(match key {
        "welcomeMessage" => "Здравствуйте! Я ИИ-ассистент, который поможет вам составить юридический документ. Какой тип документа вам нужен? Например, договор купли-продажи, аренды, оказания услуг, подряда или трудовой договор.",
        "consultationWelcomeMessage" => "Здравствуйте! Я ИИ-консультант по законодательству Республики Казахстан. Задайте ваш вопрос, и я постараюсь помочь.",
        "errorMessage" => "Извините, произошла ошибка при обработке вашего запроса. Пожалуйста, попробуйте еще раз.",
        "mockGreeting" => "Здравствуйте! Я ИИ-ассистент, который поможет вам составить юридический документ. Какой тип документа вам нужен?",
        "mockAskType" => "Уточните, пожалуйста, какой тип юридического документа вам нужен? Например, договор купли-продажи, аренды, оказания услуг, подряда или трудовой договор.",
        "mockTypeDetected" => "Я понимаю, что вам нужен документ «{{type}}». Расскажите, пожалуйста, подробнее о ваших требованиях: стороны, сроки, основные условия.",
        "mockReadyResponse" => "Отлично! У меня достаточно информации для документа «{{type}}». Сформируйте его командой /zanger generate.",
        "mockConsultReference" => "Вот что говорит законодательство по вашему вопросу:",
        "mockConsultDefault" => "Уточните, пожалуйста, ваш вопрос. Например, о договоре купли-продажи, аренде или трудовых отношениях.",
        "documentReady" => "Документ готов к формированию. Используйте /zanger generate.",
        "documentNotReady" => "Документ еще не готов к формированию. Продолжите диалог, чтобы я собрал необходимую информацию.",
        "documentGenerated" => "Документ сформирован! Скачать:",
        "documentGenerationError" => "Не удалось сформировать документ. Попробуйте еще раз.",
        "templateDocumentGenerated" => "Документ по шаблону сформирован.",
        "templateGenerationError" => "Не удалось сформировать документ по шаблону.",
        "templateNotFound" => "Шаблон «{{id}}» не найден.",
        "missingFields" => "Заполните обязательные поля: {{fields}}",
        "noTemplates" => "Шаблоны не найдены.",
        "templatesHeader" => "Доступные шаблоны",
        "fieldsHeader" => "Поля",
        "signInRequired" => "Для формирования документов нужно войти. Привяжите почту: /zanger link",
        "invalidEmail" => "Укажите корректный адрес электронной почты.",
        "busy" => "Я еще отвечаю на предыдущее сообщение. Подождите, пожалуйста.",
        "emptyMessage" => "Сообщение не может быть пустым.",
        "resetDone" => "Диалог сброшен. Начнем заново!",
        "linked" => "Вы вошли как {{email}}.",
        "unlinked" => "Вы вышли из аккаунта.",
        "notLinked" => "Вы еще не вошли.",
        "languageSet" => "Язык интерфейса: русский.",
        "noSubscription" => "Активная подписка не найдена.",
        "statusTypeLabel" => "Тип документа",
        "statusStateLabel" => "Статус",
        "statusNoType" => "не определен",
        "planName" => "План",
        "planStatus" => "Статус",
        "planUntil" => "Действует до",
        _ => return None,
    })
}

fn kk(key: &str) -> Option<&'static str> {
    Some(match key {
        "welcomeMessage" => "Сәлеметсіз бе! Мен сізге заң құжатын дайындауға көмектесетін ЖИ-ассистентпін. Сізге қандай құжат түрі қажет? Мысалы, сатып алу-сату, жалдау, қызмет көрсету, мердігерлік немесе еңбек шарты.",
        "consultationWelcomeMessage" => "Сәлеметсіз бе! Мен Қазақстан Республикасының заңнамасы бойынша ЖИ-кеңесшімін. Сұрағыңызды қойыңыз, көмектесуге тырысамын.",
        "errorMessage" => "Кешіріңіз, сұрауыңызды өңдеу кезінде қате пайда болды. Қайталап көріңіз.",
        "mockGreeting" => "Сәлеметсіз бе! Мен заң құжатын құрастыруға көмектесетін ЖИ-ассистентпін. Сізге қандай құжат түрі қажет?",
        "mockAskType" => "Сізге қандай заң құжаты қажет екенін нақтылаңызшы. Мысалы, сатып алу-сату, жалдау, қызмет көрсету, мердігерлік немесе еңбек шарты.",
        "mockTypeDetected" => "Сізге «{{type}}» құжаты қажет екенін түсіндім. Талаптарыңыз туралы толығырақ айтып беріңізші: тараптар, мерзімдер, негізгі шарттар.",
        "mockReadyResponse" => "Тамаша! «{{type}}» құжаты үшін ақпарат жеткілікті. Оны /zanger generate пәрменімен қалыптастырыңыз.",
        "mockConsultReference" => "Сіздің сұрағыңыз бойынша заңнамада былай делінген:",
        "mockConsultDefault" => "Сұрағыңызды нақтылаңызшы. Мысалы, сатып алу-сату шарты, жалдау немесе еңбек қатынастары туралы.",
        "documentReady" => "Құжат қалыптастыруға дайын. /zanger generate пәрменін қолданыңыз.",
        "documentNotReady" => "Құжат әзірше дайын емес. Қажетті ақпаратты жинау үшін диалогты жалғастырыңыз.",
        "documentGenerated" => "Құжат қалыптастырылды! Жүктеп алу:",
        "documentGenerationError" => "Құжатты қалыптастыру мүмкін болмады. Қайталап көріңіз.",
        "templateDocumentGenerated" => "Үлгі бойынша құжат қалыптастырылды.",
        "templateGenerationError" => "Үлгі бойынша құжатты қалыптастыру мүмкін болмады.",
        "templateNotFound" => "«{{id}}» үлгісі табылмады.",
        "missingFields" => "Міндетті өрістерді толтырыңыз: {{fields}}",
        "noTemplates" => "Үлгілер табылмады.",
        "templatesHeader" => "Қолжетімді үлгілер",
        "fieldsHeader" => "Өрістер",
        "signInRequired" => "Құжаттарды қалыптастыру үшін кіру қажет. Поштаңызды байланыстырыңыз: /zanger link",
        "invalidEmail" => "Жарамды электрондық пошта мекенжайын көрсетіңіз.",
        "busy" => "Мен алдыңғы хабарламаға әлі жауап беріп жатырмын. Сәл күте тұрыңыз.",
        "emptyMessage" => "Хабарлама бос бола алмайды.",
        "resetDone" => "Диалог қайта басталды. Қайтадан бастайық!",
        "linked" => "Сіз {{email}} ретінде кірдіңіз.",
        "unlinked" => "Сіз аккаунттан шықтыңыз.",
        "notLinked" => "Сіз әлі кірген жоқсыз.",
        "languageSet" => "Интерфейс тілі: қазақша.",
        "noSubscription" => "Белсенді жазылым табылмады.",
        "statusTypeLabel" => "Құжат түрі",
        "statusStateLabel" => "Күйі",
        "statusNoType" => "анықталмаған",
        "planName" => "Жоспар",
        "planStatus" => "Күйі",
        "planUntil" => "Мерзімі",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_resolves_in_both_locales() {
        assert!(t(Lang::Ru, "welcomeMessage").contains("юридический документ"));
        assert!(t(Lang::Kk, "welcomeMessage").contains("заң құжатын"));
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(t(Lang::Ru, "noSuchKey"), "noSuchKey");
        assert_eq!(t(Lang::Kk, "noSuchKey"), "noSuchKey");
    }

    #[test]
    fn test_params_are_interpolated() {
        let text = t_with(Lang::Ru, "linked", &[("email", "ana@example.kz")]);
        assert_eq!(text, "Вы вошли как ana@example.kz.");
    }

    #[test]
    fn test_missing_param_left_verbatim() {
        let text = t_with(Lang::Ru, "linked", &[]);
        assert!(text.contains("{{email}}"));
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Lang::from_code("ru"), Some(Lang::Ru));
        assert_eq!(Lang::from_code("KK"), Some(Lang::Kk));
        assert_eq!(Lang::from_code("kz"), Some(Lang::Kk));
        assert_eq!(Lang::from_code("en"), None);
    }
}

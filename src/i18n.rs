use std::collections::HashMap;

pub struct I18n {
    translations: HashMap<String, HashMap<String, String>>,
    current_lang: String,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut translations = HashMap::new();

        // English
        let mut en = HashMap::new();
        // Key help
        en.insert("help_quit".to_string(), "quit".to_string());
        en.insert("help_back".to_string(), "back".to_string());
        en.insert("help_diff".to_string(), "diff".to_string());
        en.insert("help_status".to_string(), "status".to_string());
        en.insert("help_pause".to_string(), "pause".to_string());
        en.insert("help_browse".to_string(), "browse".to_string());
        en.insert("help_confirm".to_string(), "confirm".to_string());
        en.insert("help_left".to_string(), "left".to_string());
        en.insert("help_right".to_string(), "right".to_string());
        en.insert("help_up".to_string(), "up".to_string());
        en.insert("help_down".to_string(), "down".to_string());
        en.insert("help_page_up".to_string(), "page up".to_string());
        en.insert("help_page_down".to_string(), "page down".to_string());
        en.insert("help_left_edge".to_string(), "line start".to_string());
        en.insert("help_right_edge".to_string(), "line end".to_string());
        en.insert("help_top".to_string(), "top".to_string());
        en.insert("help_bottom".to_string(), "bottom".to_string());

        // Runtime messages
        en.insert("initializing".to_string(), "Initializing...".to_string());
        en.insert("exit_code".to_string(), "Exit code: {0}".to_string());
        en.insert("window_title".to_string(), "dtw: {0}".to_string());
        en.insert("notification".to_string(), "dtw: output changed".to_string());

        // CLI
        en.insert("error_command_required".to_string(), "Error: command required".to_string());
        en.insert("usage".to_string(), "Usage: dtw [OPTIONS] <COMMAND>...".to_string());
        en.insert("usage_hint".to_string(), "Run 'dtw --help' for the list of options".to_string());
        en.insert("error_prefix".to_string(), "Error".to_string());

        // Chinese
        let mut zh = HashMap::new();
        zh.insert("help_quit".to_string(), "退出".to_string());
        zh.insert("help_back".to_string(), "返回".to_string());
        zh.insert("help_diff".to_string(), "差异".to_string());
        zh.insert("help_status".to_string(), "状态栏".to_string());
        zh.insert("help_pause".to_string(), "暂停".to_string());
        zh.insert("help_browse".to_string(), "历史".to_string());
        zh.insert("help_confirm".to_string(), "确认".to_string());
        zh.insert("help_left".to_string(), "左移".to_string());
        zh.insert("help_right".to_string(), "右移".to_string());
        zh.insert("help_up".to_string(), "上移".to_string());
        zh.insert("help_down".to_string(), "下移".to_string());
        zh.insert("help_page_up".to_string(), "上一页".to_string());
        zh.insert("help_page_down".to_string(), "下一页".to_string());
        zh.insert("help_left_edge".to_string(), "行首".to_string());
        zh.insert("help_right_edge".to_string(), "行尾".to_string());
        zh.insert("help_top".to_string(), "顶部".to_string());
        zh.insert("help_bottom".to_string(), "底部".to_string());

        zh.insert("initializing".to_string(), "初始化中...".to_string());
        zh.insert("exit_code".to_string(), "退出码: {0}".to_string());
        zh.insert("window_title".to_string(), "dtw: {0}".to_string());
        zh.insert("notification".to_string(), "dtw: 输出已变化".to_string());

        zh.insert("error_command_required".to_string(), "错误: 需要指定命令".to_string());
        zh.insert("usage".to_string(), "用法: dtw [选项] <命令>...".to_string());
        zh.insert("usage_hint".to_string(), "运行 'dtw --help' 查看全部选项".to_string());
        zh.insert("error_prefix".to_string(), "错误".to_string());

        translations.insert("en".to_string(), en);
        translations.insert("zh".to_string(), zh);

        // Accept zh_CN, zh-TW, cn, chinese ...; everything else falls back to English
        let effective_lang = if lang.starts_with("zh") || lang == "cn" || lang == "chinese" {
            "zh"
        } else {
            "en"
        };

        Self {
            translations,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        for lang in [self.current_lang.as_str(), "en"] {
            if let Some(value) = self.translations.get(lang).and_then(|m| m.get(key)) {
                return value.clone();
            }
        }
        key.to_string()
    }

    pub fn t_format(&self, key: &str, args: &[&str]) -> String {
        let template = self.t(key);
        let mut result = template;
        for (i, arg) in args.iter().enumerate() {
            result = result.replace(&format!("{{{}}}", i), arg);
        }
        result
    }
}

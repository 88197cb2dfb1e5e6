//! 翻题与分页
//!
//! 只管理"当前题目"游标和状态面板页码，不持有答题记录；
//! `next` 需要的"是否已作答"由调用方传入。

use crate::error::{ConfigError, SessionError};

/// 状态面板布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// 每页题数
    pub questions_per_page: usize,
    /// 每行列数
    pub grid_columns: usize,
}

impl PageLayout {
    /// 每页题数和列数都必须大于 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "questions_per_page".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.grid_columns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "grid_columns".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            questions_per_page: 30,
            grid_columns: 6,
        }
    }
}

/// 翻页方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

/// 翻题控制器
#[derive(Debug)]
pub struct Navigator {
    total: usize,
    layout: PageLayout,
    current_question: usize,
    current_page: usize,
}

impl Navigator {
    /// 创建控制器
    ///
    /// 没有题目时所有操作都停在索引 0；每页题数为 0 时按每页 1 题处理。
    pub fn new(total: usize, layout: PageLayout) -> Self {
        Self {
            total,
            layout,
            current_question: 0,
            current_page: 0,
        }
    }

    /// 跳过当前题，到末尾后回到第一题，不要求已作答
    pub fn skip(&mut self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.current_question = (self.current_question + 1) % self.total;
        self.current_question
    }

    /// 上一题，在第一题时回到最后一题
    pub fn previous(&mut self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.current_question = (self.current_question + self.total - 1) % self.total;
        self.current_question
    }

    /// 下一题，只有当前题已作答才前进
    pub fn next(&mut self, current_answered: bool) -> Result<usize, SessionError> {
        if !current_answered {
            return Err(SessionError::AnswerRequired {
                number: self.current_question + 1,
            });
        }
        Ok(self.skip())
    }

    /// 直接跳到某题（状态面板点击），不要求已作答
    pub fn jump_to(&mut self, question_index: usize) -> Result<usize, SessionError> {
        if question_index >= self.total {
            return Err(SessionError::QuestionOutOfRange {
                index: question_index,
                total: self.total,
            });
        }
        self.current_question = question_index;
        Ok(self.current_question)
    }

    /// 翻页：页码限制在 `[0, 最后一页]`，当前题目重置为目标页第一题
    pub fn change_page(&mut self, direction: PageDirection) -> usize {
        let last_page = self.page_count().saturating_sub(1);
        self.current_page = match direction {
            PageDirection::Previous => self.current_page.saturating_sub(1),
            PageDirection::Next => (self.current_page + 1).min(last_page),
        };
        self.current_question = self.current_page * self.per_page();
        self.current_page
    }

    /// 总页数（向上取整）
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.per_page())
    }

    /// 当前页包含的题目索引范围
    pub fn page_range(&self) -> std::ops::Range<usize> {
        let start = (self.current_page * self.per_page()).min(self.total);
        let end = (start + self.per_page()).min(self.total);
        start..end
    }

    fn per_page(&self) -> usize {
        self.layout.questions_per_page.max(1)
    }

    pub fn current_question(&self) -> usize {
        self.current_question
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(per_page: usize) -> PageLayout {
        PageLayout {
            questions_per_page: per_page,
            grid_columns: 3,
        }
    }

    #[test]
    fn test_skip_and_previous_wrap() {
        let mut nav = Navigator::new(3, PageLayout::default());
        assert_eq!(nav.previous(), 2);
        assert_eq!(nav.skip(), 0);
        assert_eq!(nav.skip(), 1);
        assert_eq!(nav.skip(), 2);
        assert_eq!(nav.skip(), 0);
    }

    #[test]
    fn test_next_requires_answer() {
        let mut nav = Navigator::new(2, PageLayout::default());

        let err = nav.next(false).unwrap_err();
        assert!(matches!(err, SessionError::AnswerRequired { number: 1 }));
        assert_eq!(nav.current_question(), 0);

        assert_eq!(nav.next(true).unwrap(), 1);
        assert_eq!(nav.next(true).unwrap(), 0);
    }

    #[test]
    fn test_jump_to_bounds() {
        let mut nav = Navigator::new(5, PageLayout::default());
        assert_eq!(nav.jump_to(4).unwrap(), 4);
        assert!(nav.jump_to(5).is_err());
        assert_eq!(nav.current_question(), 4);
    }

    #[test]
    fn test_change_page_clamps_and_resets_cursor() {
        let mut nav = Navigator::new(25, layout(10));
        assert_eq!(nav.page_count(), 3);

        assert_eq!(nav.change_page(PageDirection::Previous), 0);
        assert_eq!(nav.current_question(), 0);

        assert_eq!(nav.change_page(PageDirection::Next), 1);
        assert_eq!(nav.current_question(), 10);
        assert_eq!(nav.change_page(PageDirection::Next), 2);
        assert_eq!(nav.current_question(), 20);
        assert_eq!(nav.page_range(), 20..25);

        assert_eq!(nav.change_page(PageDirection::Next), 2);
        assert_eq!(nav.current_question(), 20);

        assert_eq!(nav.change_page(PageDirection::Previous), 1);
        assert_eq!(nav.current_question(), 10);
    }

    #[test]
    fn test_zero_page_width_does_not_panic() {
        let mut nav = Navigator::new(3, layout(0));
        assert_eq!(nav.page_count(), 3);
        assert_eq!(nav.change_page(PageDirection::Next), 1);
        assert_eq!(nav.current_question(), 1);
        assert_eq!(nav.page_range(), 1..2);
    }

    #[test]
    fn test_empty_navigator_stays_at_zero() {
        let mut nav = Navigator::new(0, PageLayout::default());
        assert_eq!(nav.skip(), 0);
        assert_eq!(nav.previous(), 0);
        assert_eq!(nav.change_page(PageDirection::Next), 0);
        assert_eq!(nav.page_range(), 0..0);
        assert!(nav.jump_to(0).is_err());
    }

    #[test]
    fn test_layout_validation() {
        assert!(PageLayout::default().validate().is_ok());
        assert!(matches!(
            layout(0).validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "questions_per_page"
        ));
        let no_columns = PageLayout {
            questions_per_page: 10,
            grid_columns: 0,
        };
        assert!(matches!(
            no_columns.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "grid_columns"
        ));
    }

    #[test]
    fn test_single_page_exam() {
        let mut nav = Navigator::new(4, PageLayout::default());
        nav.jump_to(3).unwrap();
        assert_eq!(nav.change_page(PageDirection::Next), 0);
        assert_eq!(nav.current_question(), 0);
        assert_eq!(nav.page_range(), 0..4);
    }
}

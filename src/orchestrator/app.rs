//! 终端考试应用 - 编排层入口
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、创建网关、整理考生身份
//! 2. **事件循环**：同时等待终端输入和倒计时信号（`tokio::select!`），
//!    两路事件都只交给 `ExamSession` 处理，会话状态只在这一个任务里变化。
//!    终端输入由独立线程按行读取后送入通道，会话结束时不必等待考生再按回车
//! 3. **展示**：把当前题目、进度、剩余时间、状态面板打印到终端

use std::io::BufRead;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info, warn};

use crate::clients::{build_gateway, ExamGateway};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::orchestrator::command::{Command, HELP_TEXT};
use crate::orchestrator::exam_session::{AuthContext, ExamSession, FinishOutcome, SessionSignal};
use crate::session::{format_remaining, FinishTrigger, SessionPhase};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    gateway: Box<dyn ExamGateway>,
    auth: AuthContext,
}

/// 一条命令处理后循环该怎么走
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        if config.exam_id.trim().is_empty() {
            return Err(AppError::invalid_config("exam_id", "未指定考试ID (EXAM_ID)"));
        }

        logging::log_startup(&config.exam_id, &config.candidate_email);

        let gateway = build_gateway(&config)?;
        let auth = AuthContext {
            access_token: config.access_token.clone(),
            email: config.candidate_email.clone(),
        };

        Ok(Self {
            config,
            gateway,
            auth,
        })
    }

    /// 运行一次完整作答
    pub async fn run(self) -> AppResult<()> {
        let Self {
            config,
            gateway,
            auth,
        } = self;

        let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
        let mut session =
            ExamSession::new(gateway, config.exam_id.clone(), config.page_layout(), signal_tx)?;

        // 加载失败时会话无法开始
        session.load(&auth).await?;
        println!("{}", HELP_TEXT);
        render_question(&session);

        let mut lines = spawn_stdin_reader();
        drive(&mut session, &auth, &mut signal_rx, &mut lines).await
    }
}

/// 在独立线程里按行读取标准输入
///
/// 线程阻塞在读取上也不会拖住运行时关闭，进程退出时随之结束。
fn spawn_stdin_reader() -> UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// 事件循环：处理输入行和倒计时信号，直到会话结束或考生放弃
async fn drive<G: ExamGateway>(
    session: &mut ExamSession<G>,
    auth: &AuthContext,
    signals: &mut UnboundedReceiver<SessionSignal>,
    lines: &mut UnboundedReceiver<std::io::Result<String>>,
) -> AppResult<()> {
    while session.phase() != SessionPhase::Terminated {
        tokio::select! {
            Some(signal) = signals.recv() => {
                report_finish(session.on_signal(signal, auth).await);
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    warn!("⚠️ 输入已关闭，放弃本次作答");
                    break;
                };
                if handle_line(session, auth, &line?).await == Flow::Quit {
                    warn!("⚠️ 考生放弃作答，答卷未提交");
                    break;
                }
            }
        }
    }

    if session.phase() == SessionPhase::Terminated {
        info!("🏠 已返回考生主页");
    }
    Ok(())
}

/// 处理一行终端输入
async fn handle_line<G: ExamGateway>(
    session: &mut ExamSession<G>,
    auth: &AuthContext,
    line: &str,
) -> Flow {
    if line.trim().is_empty() {
        return Flow::Continue;
    }
    let Some(command) = Command::parse(line) else {
        println!("无法识别的命令: {} (输入 help 查看帮助)", line.trim());
        return Flow::Continue;
    };

    let result = match command {
        Command::Select(option) => session.select_current(option).map(|_| ()),
        Command::Next => session.next().map(|_| ()),
        Command::Previous => session.previous().map(|_| ()),
        Command::Skip => session.skip().map(|_| ()),
        Command::Jump(index) => session.jump_to(index).map(|_| ()),
        Command::Page(direction) => session.change_page(direction).map(|_| ()),
        Command::Grid => {
            render_grid(session);
            return Flow::Continue;
        }
        Command::Help => {
            println!("{}", HELP_TEXT);
            return Flow::Continue;
        }
        Command::Quit => return Flow::Quit,
        Command::Submit => {
            let outcome = if session.phase() == SessionPhase::Finishing {
                session.resubmit(auth).await
            } else {
                session.finish(FinishTrigger::Manual, auth).await
            };
            report_finish(outcome);
            return Flow::Continue;
        }
    };

    match result {
        Ok(()) => render_question(session),
        Err(e) if e.is_user_facing() => println!("⚠️ {}", e),
        Err(e) => error!("{}", e),
    }
    Flow::Continue
}

// ========== 展示辅助函数 ==========

fn report_finish(outcome: AppResult<FinishOutcome>) {
    match outcome {
        Ok(FinishOutcome::Submitted(payload)) => {
            println!(
                "✅ 已交卷: {}，已答 {}/{} 题，用时 {}",
                payload.title,
                payload.answered_count(),
                payload.questions.len(),
                logging::format_duration(payload.duration_taken)
            );
        }
        Ok(FinishOutcome::Ignored) => {}
        Err(e) => {
            println!("❌ 交卷失败: {}", e);
            println!("输入 submit 重新提交");
        }
    }
}

fn render_question<G: ExamGateway>(session: &ExamSession<G>) {
    let Some(view) = session.current_question() else {
        return;
    };

    println!();
    println!(
        "{} | 已答: {}/{} | 剩余时间: {}",
        session.exam_title().unwrap_or_default(),
        session.answered_count(),
        session.question_count(),
        session.time_left().map(format_remaining).unwrap_or_default()
    );
    println!("{}. {}", view.number, view.text);
    for (i, option) in view.options.iter().enumerate() {
        let mark = if option.selected { "(*)" } else { "( )" };
        println!("  {} {}. {}", mark, i + 1, option.text);
    }
}

fn render_grid<G: ExamGateway>(session: &ExamSession<G>) {
    println!(
        "题目状态 (第 {} 页)  ✓ 已答  · 未答  [ ] 当前",
        session.current_page().map(|p| p + 1).unwrap_or_default()
    );
    for row in session.status_grid() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| {
                let status = if cell.answered { "✓" } else { "·" };
                if cell.current {
                    format!("[{:>3}{}]", cell.number, status)
                } else {
                    format!(" {:>3}{} ", cell.number, status)
                }
            })
            .collect();
        println!("{}", cells.join(""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::models::{AnswerOption, Exam, Question, SubmissionPayload};
    use crate::session::PageLayout;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct ScriptedGateway {
        duration: u32,
        submissions: Arc<Mutex<Vec<SubmissionPayload>>>,
        reject_submit: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ExamGateway for ScriptedGateway {
        async fn fetch_exam(&self, exam_id: &str, _access_token: &str) -> AppResult<Exam> {
            Ok(Exam {
                id: exam_id.to_string(),
                title: "终端测验".to_string(),
                duration: self.duration,
                questions: vec![Question {
                    id: "q1".to_string(),
                    text: "1 + 1 = ?".to_string(),
                    answers: vec![
                        AnswerOption {
                            id: "a".to_string(),
                            text: "2".to_string(),
                            correct: true,
                        },
                        AnswerOption {
                            id: "b".to_string(),
                            text: "3".to_string(),
                            correct: false,
                        },
                    ],
                }],
            })
        }

        async fn submit_attempt(
            &self,
            exam_id: &str,
            payload: &SubmissionPayload,
            _access_token: &str,
        ) -> AppResult<()> {
            if self.reject_submit.load(Ordering::SeqCst) {
                return Err(GatewayError::BadStatus {
                    endpoint: format!("submit-answer/{}", exam_id),
                    status: 502,
                }
                .into());
            }
            self.submissions.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    fn auth() -> AuthContext {
        AuthContext {
            access_token: "t".to_string(),
            email: "tty@example.com".to_string(),
        }
    }

    async fn loaded(
        gateway: ScriptedGateway,
    ) -> (ExamSession<ScriptedGateway>, UnboundedReceiver<SessionSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut session = ExamSession::new(gateway, "9", PageLayout::default(), tx).unwrap();
        session.load(&auth()).await.unwrap();
        (session, rx)
    }

    #[tokio::test]
    async fn test_timeout_terminates_loop_while_input_stays_open() {
        let gateway = ScriptedGateway {
            duration: 0,
            ..ScriptedGateway::default()
        };
        let (mut session, mut signals) = loaded(gateway.clone()).await;
        // 发送端一直存活，模拟考生什么都没输入
        let (_line_tx, mut lines) = mpsc::unbounded_channel();

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            drive(&mut session, &auth(), &mut signals, &mut lines),
        )
        .await;

        assert!(finished.is_ok());
        assert_eq!(session.phase(), SessionPhase::Terminated);
        let submitted = gateway.submissions.lock().unwrap().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].duration_taken, 0);
        assert_eq!(submitted[0].questions[0].answers.len(), 2);
    }

    #[tokio::test]
    async fn test_closed_input_abandons_without_submit() {
        let gateway = ScriptedGateway {
            duration: 30,
            ..ScriptedGateway::default()
        };
        let (mut session, mut signals) = loaded(gateway.clone()).await;
        let (line_tx, mut lines) = mpsc::unbounded_channel();
        line_tx.send(Ok("1".to_string())).unwrap();
        drop(line_tx);

        drive(&mut session, &auth(), &mut signals, &mut lines)
            .await
            .unwrap();

        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.answered_count(), 1);
        assert!(gateway.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_after_failure_resends_frozen_answers() {
        let gateway = ScriptedGateway {
            duration: 30,
            ..ScriptedGateway::default()
        };
        gateway.reject_submit.store(true, Ordering::SeqCst);
        let (mut session, _signals) = loaded(gateway.clone()).await;

        assert_eq!(handle_line(&mut session, &auth(), "1").await, Flow::Continue);
        assert_eq!(handle_line(&mut session, &auth(), "submit").await, Flow::Continue);
        assert_eq!(session.phase(), SessionPhase::Finishing);
        let frozen = session.pending_submission().cloned().unwrap();
        assert!(gateway.submissions.lock().unwrap().is_empty());

        // 交卷失败后不能再改答案
        assert_eq!(handle_line(&mut session, &auth(), "2").await, Flow::Continue);

        gateway.reject_submit.store(false, Ordering::SeqCst);
        assert_eq!(handle_line(&mut session, &auth(), "submit").await, Flow::Continue);

        assert_eq!(session.phase(), SessionPhase::Terminated);
        let submitted = gateway.submissions.lock().unwrap().clone();
        assert_eq!(submitted, vec![frozen]);
        assert_eq!(submitted[0].questions[0].answers[0].id, "a");
    }

    #[tokio::test]
    async fn test_quit_command_stops_loop() {
        let (mut session, _signals) = loaded(ScriptedGateway {
            duration: 30,
            ..ScriptedGateway::default()
        })
        .await;
        assert_eq!(handle_line(&mut session, &auth(), "quit").await, Flow::Quit);
        assert_eq!(session.phase(), SessionPhase::Active);
    }
}

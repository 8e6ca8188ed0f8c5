use std::rc::Rc;

use mirage_core as game;
use game::{Cell, Direction, GuessOutcome, HintState, Phase, RoundSnapshot, TimerTarget};
use yew::prelude::*;

use crate::progress::LocalProgress;
use crate::timers::TimerHost;
use crate::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Timer(game::TimerToken),
    CellClicked(Cell),
    StartGuessing,
    RequestHint,
    CloseHint,
    Retry,
    NextLevel,
    Navigate(Direction),
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Empty,
    Shown,
    Guessed,
    Wrong,
}

fn cell_state(snapshot: &RoundSnapshot, cell: Cell) -> ViewCellState {
    if snapshot.wrong_cell == Some(cell) {
        ViewCellState::Wrong
    } else if snapshot.is_guessed(cell) {
        ViewCellState::Guessed
    } else if snapshot.is_revealed(cell) {
        ViewCellState::Shown
    } else {
        ViewCellState::Empty
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    cell: Cell,
    state: ViewCellState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<Cell>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        cell,
        state,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match state {
            Empty => classes!(),
            Shown => classes!("lit"),
            Guessed => classes!("lit", "guessed"),
            Wrong => classes!("wrong"),
        }
    );
    if locked {
        class.push("locked");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("cell {} clicked", cell);
        callback.emit(cell);
    });

    html! {
        <td {class} {onclick}>
            if matches!(state, Shown | Guessed) {
                <span class="dot"/>
            }
        </td>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct RoundProps {
    pub ladder: Rc<game::Ladder<LocalProgress>>,
    pub config: game::EngineConfig,
    /// Level picked on the map, `None` resumes stored progress.
    #[prop_or_default]
    pub start_level: Option<usize>,
    pub on_home: Callback<()>,
}

#[derive(Debug)]
pub(crate) struct RoundView {
    engine: game::RoundEngine<LocalProgress>,
    timers: TimerHost,
}

impl RoundView {
    fn sync_timers(&mut self, ctx: &Context<Self>) {
        let commands = self.engine.take_timer_commands();
        if !commands.is_empty() {
            self.timers.apply(commands, &ctx.link().callback(Msg::Timer));
        }
    }

    fn popup(&self, ctx: &Context<Self>, snapshot: &RoundSnapshot) -> Option<Html> {
        use Msg::*;
        let link = ctx.link();

        let body = match snapshot.phase {
            Phase::ReadyToGuess => html! {
                <>
                    <h2>{"Ready?"}</h2>
                    <p>{"Memorize the dots, then start guessing!"}</p>
                    <button onclick={link.callback(|_| StartGuessing)}>{"Start"}</button>
                </>
            },
            Phase::GameOver => html! {
                <>
                    <h2>{"Game Over"}</h2>
                    <p>{"You selected an incorrect tile. Try again!"}</p>
                    <button onclick={link.callback(|_| Retry)}>{"Retry"}</button>
                </>
            },
            Phase::TimeOver => html! {
                <>
                    <h2>{"Time Over"}</h2>
                    <p>{"You ran out of time. Try again!"}</p>
                    <button onclick={link.callback(|_| Retry)}>{"Retry"}</button>
                </>
            },
            Phase::Won => html! {
                <>
                    <h2>{"Level Complete!"}</h2>
                    <p>{format!("Next level in {}s", snapshot.countdown)}</p>
                    <button onclick={link.callback(|_| NextLevel)}>{"Next Level"}</button>
                </>
            },
            Phase::GameCompleted => html! {
                <>
                    <h2>{"Congratulations!"}</h2>
                    <p>{format!("You've completed all {} levels!", snapshot.level_count)}</p>
                    <button onclick={link.callback(|_| NextLevel)}>{"Play Again"}</button>
                </>
            },
            Phase::Guessing if snapshot.hint == HintState::Shown => html! {
                <>
                    <h2>{"Hint"}</h2>
                    <p>{snapshot.hint_text.clone().unwrap_or_default()}</p>
                    <button onclick={link.callback(|_| CloseHint)}>{"Close"}</button>
                </>
            },
            Phase::Start | Phase::Showing | Phase::Guessing => return None,
        };

        Some(html! { <Modal>{body}</Modal> })
    }

    fn hint_button(&self, ctx: &Context<Self>, snapshot: &RoundSnapshot) -> Html {
        if !snapshot.hints_enabled {
            return html! {};
        }

        let label = match snapshot.hint {
            HintState::Pending { remaining_secs } => format!("Hint in {}s", remaining_secs),
            HintState::Idle | HintState::Shown => "Hint".to_string(),
        };
        let disabled = snapshot.phase != Phase::Guessing || snapshot.hint != HintState::Idle;

        html! {
            <button class="hint" {disabled} onclick={ctx.link().callback(|_| Msg::RequestHint)}>
                {label}
            </button>
        }
    }
}

impl Component for RoundView {
    type Message = Msg;
    type Properties = RoundProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let ladder = (*props.ladder).clone();
        let mut engine = game::RoundEngine::new(ladder, props.config.clone());

        match props.start_level {
            Some(index) => engine.start_round(index),
            None => engine.resume(),
        };

        let mut view = Self {
            engine,
            timers: TimerHost::default(),
        };
        view.sync_timers(ctx);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Timer(token) => {
                self.timers.fired(token);
                self.engine.fire(token)
            }
            CellClicked(cell) => {
                let outcome = self.engine.submit_guess(cell);
                log::debug!("guess {}: {:?}", cell, outcome);
                if outcome == GuessOutcome::Completed {
                    log::info!("level {} complete", self.engine.level().display_number());
                }
                outcome.has_update()
            }
            StartGuessing => self.engine.start_guessing(),
            RequestHint => self.engine.request_hint(),
            CloseHint => self.engine.close_hint(),
            Retry => self.engine.retry(),
            NextLevel => self.engine.next_level(),
            Navigate(direction) => self.engine.navigate(direction),
        };

        self.sync_timers(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let snapshot = self.engine.snapshot();
        let grid_size = snapshot.grid_size;
        let guessing = snapshot.phase == Phase::Guessing;
        let progress = 100 * snapshot.time_remaining / snapshot.guess_time.max(1);
        let urgent = guessing && snapshot.time_remaining <= 5;
        let on_home = ctx.props().on_home.clone();
        let on_cell = ctx.link().callback(CellClicked);

        html! {
            <div class="mirage round">
                <header>
                    <button class="back" onclick={Callback::from(move |_: MouseEvent| on_home.emit(()))}>{"←"}</button>
                    <span class="level">{format!("Level {}", snapshot.display_number)}</span>
                </header>
                <nav class="timer">
                    <div class="bar"><div class="fill" style={format!("width: {}%", progress)}/></div>
                    <aside class={classes!(urgent.then_some("urgent"))}>
                        {format_clock(snapshot.time_remaining)}
                    </aside>
                </nav>
                { self.popup(ctx, &snapshot).unwrap_or_default() }
                <table class={guessing.then_some("playable")}>
                    {
                        for (0..grid_size).map(|row| html! {
                            <tr>
                                {
                                    for (0..grid_size).map(|col| {
                                        let cell = game::coords_to_cell((row, col), grid_size);
                                        let state = cell_state(&snapshot, cell);
                                        html! {
                                            <CellView {cell} {state} locked={!guessing} callback={on_cell.clone()}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <footer>
                    <button onclick={ctx.link().callback(|_| Navigate(Direction::Previous))}>{"Prev"}</button>
                    <button
                        class="retry"
                        disabled={matches!(snapshot.phase, Phase::Showing | Phase::Won | Phase::GameCompleted)}
                        onclick={ctx.link().callback(|_| Retry)}
                    >
                        {"Retry"}
                    </button>
                    <button onclick={ctx.link().callback(|_| Navigate(Direction::Next))}>{"Next"}</button>
                    { self.hint_button(ctx, &snapshot) }
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.engine.shutdown();
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RoundSnapshot {
        RoundSnapshot {
            phase: Phase::Guessing,
            level_index: 0,
            display_number: 1,
            level_count: 20,
            grid_size: game::GRID_SIZE,
            revealed_cells: [0, 1, 2, 3, 4].into_iter().collect(),
            guessed_cells: [4].into_iter().collect(),
            guess_cursor: 1,
            time_remaining: 20,
            guess_time: 20,
            countdown: 0,
            wrong_cell: Some(9),
            hint: HintState::Idle,
            hint_text: None,
            hints_enabled: true,
        }
    }

    #[test]
    fn cell_states_follow_the_snapshot() {
        let snapshot = snapshot();

        assert_eq!(cell_state(&snapshot, 0), ViewCellState::Shown);
        assert_eq!(cell_state(&snapshot, 4), ViewCellState::Guessed);
        assert_eq!(cell_state(&snapshot, 9), ViewCellState::Wrong);
        assert_eq!(cell_state(&snapshot, 48), ViewCellState::Empty);
    }
}

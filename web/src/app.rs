use std::rc::Rc;

use mirage_core::{EngineConfig, Ladder};
use yew::prelude::*;

use crate::map::LevelMapView;
use crate::modes::Mode;
use crate::progress::LocalProgress;
use crate::round::RoundView;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Screen {
    Map,
    Round { start_level: Option<usize> },
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AppProps {
    pub ladder: Rc<Ladder<LocalProgress>>,
    pub config: EngineConfig,
    pub mode: Mode,
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    let screen = use_state(|| Screen::Map);
    // bumped to re-read progress after "start over"
    let revision = use_state(|| 0u32);

    match *screen {
        Screen::Map => {
            let on_select = {
                let screen = screen.clone();
                Callback::from(move |index: usize| {
                    log::debug!("level {} selected", index);
                    screen.set(Screen::Round {
                        start_level: Some(index),
                    });
                })
            };
            let on_resume = {
                let screen = screen.clone();
                Callback::from(move |_: ()| screen.set(Screen::Round { start_level: None }))
            };
            let on_reset = {
                let revision = revision.clone();
                Callback::from(move |_: ()| {
                    LocalProgress::clear();
                    revision.set(revision.wrapping_add(1));
                })
            };

            html! {
                <LevelMapView
                    title={props.mode.title()}
                    levels={props.ladder.status()}
                    {on_select}
                    {on_resume}
                    {on_reset}
                />
            }
        }
        Screen::Round { start_level } => {
            let on_home = {
                let screen = screen.clone();
                Callback::from(move |_: ()| screen.set(Screen::Map))
            };

            html! {
                <RoundView
                    ladder={props.ladder.clone()}
                    config={props.config.clone()}
                    {start_level}
                    {on_home}
                />
            }
        }
    }
}

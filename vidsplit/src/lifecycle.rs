/*!
    Resource ownership for one split run.

    Resources are acquired in a fixed order and every acquisition pushes a
    marker onto a stack. Teardown pops the stack, so whatever succeeded is
    released in exactly the reverse order, whether the run finished or
    failed halfway. A marker is popped once, so nothing is released twice
    and nothing that was never acquired is released at all.

    Acquisition order:

    1. input container
    2. video output container
    3. audio output container
    4. packet buffer
    5. bitstream adapter
    6. video I/O handle, if the format writes to a file
    7. audio I/O handle, likewise
*/

use std::fmt;

use ffmpeg_types::{Error as MediaError, StreamType};
use tracing::debug;

use crate::adapter::Adapter;
use crate::backend::Backend;
use crate::error::{SplitError, SplitResult};
use crate::output::OutputStream;

/// Where a run is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// Acquiring resources; nothing written yet.
    Idle,
    /// Both headers are written.
    HeadersWritten,
    /// Routing packets.
    Streaming,
    /// Writing trailers.
    Finalizing,
    /// A hard failure happened; unwinding.
    Aborting,
    /// Everything released.
    Closed,
}

impl State {
    pub fn can_become(self, next: State) -> bool {
        use State::*;
        matches!(
            (self, next),
            (Idle, HeadersWritten)
                | (HeadersWritten, Streaming)
                | (Streaming, Finalizing)
                | (Finalizing, Closed)
                | (Idle | HeadersWritten | Streaming, Aborting)
                | (Aborting, Closed)
        )
    }
}

/// Something the session has acquired and must release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Input,
    VideoOutput,
    AudioOutput,
    PacketBuffer,
    Adapter,
    VideoIo,
    AudioIo,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "input container",
            Self::VideoOutput => "video output container",
            Self::AudioOutput => "audio output container",
            Self::PacketBuffer => "packet buffer",
            Self::Adapter => "bitstream adapter",
            Self::VideoIo => "video output file",
            Self::AudioIo => "audio output file",
        };
        f.write_str(name)
    }
}

/**
    Everything the route loop touches at once, borrowed out of a session.
*/
pub struct RouteParts<'a, B: Backend> {
    pub input: &'a mut B::Input,
    pub packet: &'a mut B::Packet,
    pub adapter: &'a mut Adapter<B::Filter>,
    pub video: &'a mut OutputStream<B::Output>,
    pub audio: &'a mut OutputStream<B::Output>,
}

/**
    Owner of every resource of one run.

    Dropping a session that was not closed unwinds it the same way
    [`Session::close`] does.
*/
pub struct Session<B: Backend> {
    input: Option<B::Input>,
    video: Option<OutputStream<B::Output>>,
    audio: Option<OutputStream<B::Output>>,
    packet: Option<B::Packet>,
    adapter: Option<Adapter<B::Filter>>,
    stack: Vec<Resource>,
    state: State,
}

impl<B: Backend> Session<B> {
    pub fn new() -> Self {
        Self {
            input: None,
            video: None,
            audio: None,
            packet: None,
            adapter: None,
            stack: Vec::new(),
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Resources currently held, oldest first.
    #[cfg(test)]
    pub fn held(&self) -> &[Resource] {
        &self.stack
    }

    pub fn transition(&mut self, next: State) {
        debug_assert!(
            self.state.can_become(next),
            "invalid transition {:?} -> {next:?}",
            self.state
        );
        debug!("State {:?} -> {next:?}", self.state);
        self.state = next;
    }

    fn push(&mut self, resource: Resource) {
        debug_assert!(!self.stack.contains(&resource), "{resource} acquired twice");
        debug!("Acquired {resource}");
        self.stack.push(resource);
    }

    pub fn acquire_input(&mut self, input: B::Input) -> &mut B::Input {
        self.push(Resource::Input);
        self.input.insert(input)
    }

    pub fn acquire_output(&mut self, output: OutputStream<B::Output>) {
        match output.kind() {
            StreamType::Video => {
                self.push(Resource::VideoOutput);
                self.video = Some(output);
            }
            StreamType::Audio => {
                self.push(Resource::AudioOutput);
                self.audio = Some(output);
            }
        }
    }

    pub fn acquire_packet(&mut self, packet: B::Packet) {
        self.push(Resource::PacketBuffer);
        self.packet = Some(packet);
    }

    pub fn acquire_adapter(&mut self, adapter: Adapter<B::Filter>) {
        self.push(Resource::Adapter);
        self.adapter = Some(adapter);
    }

    /**
        Open the I/O handle of one output if its format needs one.
    */
    pub fn open_io(&mut self, kind: StreamType) -> SplitResult<()> {
        let (slot, marker, owner) = match kind {
            StreamType::Video => (&mut self.video, Resource::VideoIo, Resource::VideoOutput),
            StreamType::Audio => (&mut self.audio, Resource::AudioIo, Resource::AudioOutput),
        };
        let output = slot.as_mut().ok_or_else(|| missing(owner))?;
        if output.open_io()? {
            self.push(marker);
        }
        Ok(())
    }

    pub fn output_mut(&mut self, kind: StreamType) -> SplitResult<&mut OutputStream<B::Output>> {
        let slot = match kind {
            StreamType::Video => self.video.as_mut(),
            StreamType::Audio => self.audio.as_mut(),
        };
        slot.ok_or_else(|| match kind {
            StreamType::Video => missing(Resource::VideoOutput),
            StreamType::Audio => missing(Resource::AudioOutput),
        })
    }

    pub fn route_parts(&mut self) -> SplitResult<RouteParts<'_, B>> {
        let Self {
            input,
            video,
            audio,
            packet,
            adapter,
            ..
        } = self;
        Ok(RouteParts {
            input: input.as_mut().ok_or_else(|| missing(Resource::Input))?,
            packet: packet.as_mut().ok_or_else(|| missing(Resource::PacketBuffer))?,
            adapter: adapter.as_mut().ok_or_else(|| missing(Resource::Adapter))?,
            video: video.as_mut().ok_or_else(|| missing(Resource::VideoOutput))?,
            audio: audio.as_mut().ok_or_else(|| missing(Resource::AudioOutput))?,
        })
    }

    /**
        Release everything held, newest first, and mark the session closed.

        Runs the abort path if the run did not reach finalizing.
    */
    pub fn close(&mut self) {
        if self.state == State::Closed {
            return;
        }
        if !matches!(self.state, State::Finalizing | State::Aborting) {
            self.transition(State::Aborting);
        }
        while let Some(resource) = self.stack.pop() {
            self.release(resource);
        }
        self.transition(State::Closed);
    }

    fn release(&mut self, resource: Resource) {
        debug!("Releasing {resource}");
        match resource {
            Resource::AudioIo => {
                if let Some(audio) = self.audio.as_mut() {
                    audio.close_io();
                }
            }
            Resource::VideoIo => {
                if let Some(video) = self.video.as_mut() {
                    video.close_io();
                }
            }
            Resource::Adapter => drop(self.adapter.take()),
            Resource::PacketBuffer => drop(self.packet.take()),
            Resource::AudioOutput => drop(self.audio.take()),
            Resource::VideoOutput => drop(self.video.take()),
            Resource::Input => drop(self.input.take()),
        }
    }
}

impl<B: Backend> Default for Session<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Drop for Session<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: Backend> fmt::Debug for Session<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("held", &self.stack)
            .finish_non_exhaustive()
    }
}

fn missing(resource: Resource) -> SplitError {
    SplitError::AllocFailure {
        what: resource.to_string(),
        source: MediaError::invalid_data(format!("{resource} is not held by the session")),
    }
}

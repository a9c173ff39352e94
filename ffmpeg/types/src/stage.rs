/*!
    Contracts between pipeline stages.

    Codecs work on a send/receive model: a submission may be refused until
    output has been drained, and a single submission may produce zero, one
    or many outputs. These traits express that model with tagged results
    instead of status codes, so a pipeline can be written against any
    backend, including in-memory test doubles.
*/

use crate::{Packet, Picture, Rational, Result, VideoStreamInfo};

/**
    Outcome of handing input to a codec.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Submit {
    /// The input was taken.
    Accepted,
    /// The codec is full; drain its output, then submit the same input again.
    Busy,
}

/**
    Outcome of asking a codec for output.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Received<T> {
    /// An output was produced.
    Ready(T),
    /// Nothing is available until more input is submitted.
    NotReady,
    /// The codec was flushed and has emitted everything it buffered.
    EndOfStream,
}

/**
    Source of compressed packets.
*/
pub trait Demuxer {
    /**
        The video stream packets are decoded from, or None if the input
        has no video.
    */
    fn video_stream(&self) -> Option<VideoStreamInfo>;

    /**
        Read the next packet of any stream, or None once the input is exhausted.
    */
    fn next_packet(&mut self) -> Result<Option<Packet>>;
}

/**
    Packet to picture decoder.
*/
pub trait Decoder {
    /**
        Submit one compressed packet.
    */
    fn submit(&mut self, packet: &Packet) -> Result<Submit>;

    /**
        Write the next decoded picture into `picture`, overwriting it.

        `picture` is allocated by the caller and keeps its format and size;
        implementations convert into it when the decoded frame differs.
    */
    fn receive(&mut self, picture: &mut Picture) -> Result<Received<()>>;

    /**
        Signal end of input so buffered pictures can be drained.
    */
    fn flush(&mut self) -> Result<()>;
}

/**
    Picture to packet encoder.
*/
pub trait Encoder {
    /**
        Time base the encoder expects picture timestamps in, and emits
        packet timestamps in.
    */
    fn time_base(&self) -> Rational;

    /**
        Submit one picture. The picture is only borrowed; the encoder copies
        what it needs to keep.
    */
    fn submit(&mut self, picture: &Picture) -> Result<Submit>;

    /**
        Take the next encoded packet. Ownership moves to the caller.
    */
    fn receive(&mut self) -> Result<Received<Packet>>;

    /**
        Signal end of input so buffered packets can be drained.
    */
    fn flush(&mut self) -> Result<()>;
}

/**
    Packet sink writing a container.
*/
pub trait Muxer {
    /**
        Time base packets must be expressed in when written.
    */
    fn time_base(&self) -> Rational;

    /**
        Index of the output stream packets are written to.
    */
    fn stream_index(&self) -> usize;

    /**
        Write one packet. Ownership moves to the muxer.
    */
    fn write(&mut self, packet: Packet) -> Result<()>;

    /**
        Finalize the container (trailer, indexes). Called once, after the
        last packet.
    */
    fn finish(&mut self) -> Result<()>;
}
